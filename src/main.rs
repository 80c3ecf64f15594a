use captionbridge_lib::domain::error::AppError;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    captionbridge_lib::run().await
}
