fn main() -> std::process::ExitCode {
    symptrack::run()
}
