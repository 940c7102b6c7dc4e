use colored::Colorize;
use shorthand_schema::cli;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if command_line_interface.verbose() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .finish();
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{} failed to install logger: {error}", "warning:".yellow().bold());
    }

    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
