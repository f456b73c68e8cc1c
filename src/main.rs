fn main() {
    if let Err(err) = archdiagram_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
