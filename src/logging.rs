use tracing_subscriber::EnvFilter;

/// Memasang subscriber ke stderr. `RUST_LOG` diutamakan; tanpa itu hanya peringatan
/// yang tampil agar log tidak bercampur dengan kuesioner.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
