use flexi_logger::{DeferredNow, Logger};
use log::Record;

use crate::Error;

/// Logs go to stderr so they never interleave with the menu on stdout.
pub fn init() -> Result<(), Error> {
    Logger::try_with_env_or_str("warn")?
        .format(cli_format)
        .log_to_stderr()
        .start()?;

    Ok(())
}

fn cli_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {:<5} [{}] {}",
        now.format("%H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}
