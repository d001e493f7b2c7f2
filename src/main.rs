use std::fs::File;
use std::io::{stdout, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use mental_check::export::{write_csv, EXPORT_FILE_NAME};
use mental_check::report::{render_table, render_trend, trend, Summary};
use mental_check::store::{self, HistoryStore};
use mental_check::{logging, Backend, Config, Error, Session, QUESTIONS};

const TREND_WIDTH: usize = 30;

#[derive(Parser, Debug)]
#[command(name = "mental_check")]
#[command(about = "Tes kesehatan mental 20 butir dengan riwayat hasil")]
struct Cli {
    /// Berkas konfigurasi TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log sebagai baris JSON di stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Jalankan kuesioner (bawaan)
    Test {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Tampilkan tabel riwayat, statistik, dan tren
    History,
    /// Ekspor riwayat ke CSV
    Export {
        #[arg(default_value = EXPORT_FILE_NAME)]
        path: PathBuf,
    },
    /// Hapus semua hasil yang tersimpan
    Clear {
        /// Lewati konfirmasi
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json);

    let config = Config::load(cli.config.as_deref())?;
    let store = store::open(&config).await?;
    let store = store.as_ref();
    let mut input = Input::new(BufReader::new(tokio::io::stdin()));

    match cli.command.unwrap_or(Command::Test {
        name: None,
        note: None,
    }) {
        Command::Test { name, note } => run_test(store, &mut input, name, note).await,
        Command::History => show_history(store).await,
        Command::Export { path } => export(store, path).await,
        Command::Clear { yes } => clear(store, &mut input, yes).await,
    }
}

async fn run_test(
    store: &dyn HistoryStore,
    input: &mut StdinInput,
    name: Option<String>,
    note: Option<String>,
) -> Result<(), Error> {
    println!("{}", QUESTIONS.title);
    println!("{}", QUESTIONS.instruction);
    let scale = QUESTIONS
        .scale
        .iter()
        .map(|score| format!("{} = {}", score.score, score.text))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Skala: {scale}");
    println!("Ketik 0–3 lalu Enter, \"b\" untuk kembali.");
    println!();

    let name = match name {
        Some(name) => name,
        None => input.prompt("Nama (boleh kosong): ").await?.unwrap_or_default(),
    };

    let mut session = Session::start();
    loop {
        while let Some(step) = session.step() {
            let Some(question) = QUESTIONS.get(step) else {
                return Err(Error::IllegalQuestion);
            };
            let current = session
                .current_answer()
                .map(|value| format!(" [{value}]"))
                .unwrap_or_default();
            println!("{}/{}", step + 1, QUESTIONS.len());
            let Some(line) = input
                .prompt(&format!("({}). {}{current} ", step + 1, question.text))
                .await?
            else {
                return Ok(());
            };
            match line.as_str() {
                "b" | "B" => {
                    session.prev();
                }
                "" => {
                    if session.next(None).is_err() {
                        println!("Pilih nilai 0–3 dulu ya.");
                    }
                }
                value => {
                    let selected = value.parse::<u8>().map_err(|_| Error::IllegalAnswer);
                    if selected.and_then(|value| session.next(Some(value))).is_err() {
                        println!("Jawaban diisi dengan angka 0–3.");
                    }
                }
            }
        }

        let note = match &note {
            Some(note) => note.clone(),
            None => input.prompt("Catatan (boleh kosong): ").await?.unwrap_or_default(),
        };
        let completed = session.complete(store, &name, &note).await?;
        let record = &completed.saved.record;

        println!();
        println!("Nama: {}", record.name);
        println!("Skor: {} / {}", completed.result.total, completed.result.max);
        println!("Kategori: {}", completed.result.category());
        println!("Saran: {}", completed.result.advice());
        if completed.saved.backend == Backend::Local {
            println!("(Server tidak dapat dihubungi, hasil disimpan di perangkat ini.)");
        }
        println!();

        match input.prompt("Ulangi tes? (y/N) ").await? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => session.restart(),
            _ => return Ok(()),
        }
    }
}

async fn show_history(store: &dyn HistoryStore) -> Result<(), Error> {
    let records = store.list().await?;
    println!("{}", render_table(&records));
    println!();
    match Summary::from_records(&records) {
        Some(summary) => println!("{summary}"),
        None => println!("Belum ada data. Lakukan tes minimal sekali."),
    }
    println!();
    print!(
        "{}",
        render_trend(&trend(&records), TREND_WIDTH, stdout().is_terminal())
    );
    Ok(())
}

async fn export(store: &dyn HistoryStore, path: PathBuf) -> Result<(), Error> {
    let records = store.list().await?;
    let file = BufWriter::new(File::create(&path)?);
    write_csv(&records, file)?;
    println!("{} entri diekspor ke {}", records.len(), path.display());
    Ok(())
}

async fn clear(store: &dyn HistoryStore, input: &mut StdinInput, yes: bool) -> Result<(), Error> {
    if !yes {
        let confirmed = input
            .prompt(
                "Anda yakin ingin MENGHAPUS SEMUA riwayat? Tindakan ini tidak dapat dibatalkan. (y/N) ",
            )
            .await?;
        if !matches!(confirmed.as_deref(), Some("y" | "Y")) {
            return Ok(());
        }
    }
    store.clear_all().await?;
    println!("Semua riwayat dihapus.");
    Ok(())
}

type StdinInput = Input<BufReader<Stdin>>;

/// Masukan baris demi baris, biasanya dari stdin.
struct Input<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Input<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Satu baris, sudah di-trim. `None` saat masukan habis.
    async fn prompt(&mut self, message: &str) -> Result<Option<String>, Error> {
        print!("{message}");
        stdout().flush()?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|line| line.trim().to_string()))
    }
}
