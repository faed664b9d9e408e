#[tokio::main]
async fn main() {
    let code = teamscan::app::startup::startup().await;
    // Exit directly: a blocked stdin read would otherwise hold up runtime shutdown
    std::process::exit(code);
}
