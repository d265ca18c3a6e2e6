use colored::Colorize;
use json_csgen::cli;

fn main() {
    cli::init_tracing();
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
