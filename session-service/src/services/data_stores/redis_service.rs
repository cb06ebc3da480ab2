use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::error::Error;
use std::fmt;

// Shorten CRUD error mapping
fn crud<E: ToString>(e: E) -> RedisServiceErr {
    RedisServiceErr::CRUDErr(e.to_string())
}

#[derive(Debug)]
pub enum RedisServiceErr {
    ConnectionErr(String),
    CRUDErr(String),
}

impl fmt::Display for RedisServiceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedisServiceErr::ConnectionErr(str) => {
                write!(f, "error while connecting to instance: {str}")
            }
            RedisServiceErr::CRUDErr(str) => write!(f, "error while performing CRUD action: {str}"),
        }
    }
}

impl Error for RedisServiceErr {}

/// Thin async wrapper over a Redis client. A multiplexed connection is opened
/// per call; the client itself is cheap to share.
pub struct RedisService {
    client: Client,
}

impl RedisService {
    pub fn new(host: &str) -> Result<Self, RedisServiceErr> {
        let url = format!("redis://{}/", host);
        let client = Client::open(url).map_err(|e| RedisServiceErr::ConnectionErr(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, RedisServiceErr> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RedisServiceErr::ConnectionErr(e.to_string()))
    }

    /// SET with EX. A TTL of zero is clamped to one second so the key is not
    /// written without expiry.
    pub async fn set_ex(&self, key: &str, value: &str, ttl: u64) -> Result<(), RedisServiceErr> {
        let ttl = ttl.max(1);
        let mut conn = self.get_connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl).await.map_err(crud)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RedisServiceErr> {
        let mut conn = self.get_connection().await?;
        conn.get(key).await.map_err(crud)
    }

    pub async fn delete_key(&self, key: &str) -> Result<bool, RedisServiceErr> {
        let mut conn = self.get_connection().await?;
        let deleted: i32 = conn.del(key).await.map_err(crud)?;
        Ok(deleted > 0)
    }
}
