fn main() {
    snippetvault_cli::run_main();
}
