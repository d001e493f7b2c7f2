use clap::Parser;
use mental_check::{logging, read_bulk, Error};
use std::fs::File;
use std::io::BufReader;
use tracing::warn;

/// Menilai CSV jawaban tanpa header: satu baris `id,a1,...,a20`.
#[derive(Parser)]
struct Args {
    path: String,

    /// Log sebagai baris JSON di stderr
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    logging::init_tracing(args.log_json);

    let reader = BufReader::new(File::open(&args.path)?);
    for (line, row) in read_bulk(reader).enumerate() {
        match row {
            Ok((id, answers)) => match answers.to_score() {
                Ok(result) => {
                    println!(
                        "id = {}, total = {}/{}, category = {}",
                        id,
                        result.total,
                        result.max,
                        result.category()
                    );
                }
                Err(e) => {
                    warn!(row = line + 1, %id, error = %e, "row skipped");
                }
            },
            Err(e) => {
                warn!(row = line + 1, error = %e, "row skipped");
            }
        }
    }
    Ok(())
}
