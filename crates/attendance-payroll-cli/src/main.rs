#[tokio::main]
async fn main() -> anyhow::Result<()> {
    attendance_payroll_cli::run(std::env::args()).await
}
