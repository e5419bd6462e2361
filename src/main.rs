#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    proctor_lib::run().await
}
