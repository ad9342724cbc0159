use redis::Client;

/// Creates a Redis client for the selection slot
///
/// Connections are opened lazily; this only validates the URL.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}
