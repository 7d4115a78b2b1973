#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = lexicon_scan::run_from_env() {
        eprintln!("find-untranslated: {error}");
        std::process::exit(error.exit_code());
    }
}
