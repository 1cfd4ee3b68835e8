fn main() {
    if let Err(err) = brickmark::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
