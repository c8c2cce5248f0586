use std::io;

fn main() {
    chamber_cli::init_logging();
    let code = chamber_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
