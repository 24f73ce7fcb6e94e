fn main() {
    if let Err(err) = repcount_lib::run() {
        eprintln!("repcount: {err:#}");
        std::process::exit(1);
    }
}
