use efg_portal_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("efg portal error: {err}");
        std::process::exit(1);
    }
}
