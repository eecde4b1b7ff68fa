fn main() {
    if let Err(err) = sales_analytics::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
