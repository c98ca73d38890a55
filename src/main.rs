fn main() {
    topchem::cli::run();
}
