// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 _____ ___    _    ____ _   _ _____ ____
|_   _|_ _|  / \  / ___| | | | ____|  _ \
  | |  | |  / _ \| |   | |_| |  _| | |_) |
  | |  | | / ___ \ |___|  _  | |___|  _ <
  |_| |___/_/   \_\____|_| |_|_____|_| \_\

    Multiple-choice exams from your PDFs
"#;
    println!("{}", banner);
}
