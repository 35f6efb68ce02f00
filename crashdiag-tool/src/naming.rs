use chrono::NaiveDate;

/// File name of the output archive for the given run date.
pub fn archive_file_name(date: NaiveDate) -> String {
    format!("CrashDiagnostics-{}.zip", date.format("%y-%m-%d"))
}

/// File name of the on-disk run log for the given run date.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("CrashDiag-{}.log", date.format("%y-%m-%d"))
}
