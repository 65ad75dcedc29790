fn main() {
    mathplan::app::cli::run();
}
