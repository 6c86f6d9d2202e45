use paperflow_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("paperflow error: {err}");
        std::process::exit(1);
    }
}
