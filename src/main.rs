fn main() {
    if let Err(err) = plate_lookup::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
