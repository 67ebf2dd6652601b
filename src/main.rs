fn main() {
    if let Err(err) = timetable_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
