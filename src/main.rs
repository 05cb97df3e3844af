#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Logistics: cargo fleet server");
    logistics_db_rust::run_server().await
}
