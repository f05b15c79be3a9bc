mod cli;

fn main() {
    if let Err(e) = cli::run() {
        // A rejected diary entry is an expected outcome, not a crash.
        match e.rejection() {
            Some(event) => cli::print::eprint_message(&event.message()),
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}
