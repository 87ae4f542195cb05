fn main() {
    if let Err(e) = tunedrop_lib::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
