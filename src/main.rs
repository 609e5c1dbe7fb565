use std::process;

fn main() {
    if let Err(err) = parkrank::run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
