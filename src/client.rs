//! Connection handling for the Flight SQL endpoint.

use arrow_flight::decode::FlightRecordBatchStream;
use arrow_flight::sql::client::FlightSqlServiceClient;
use arrow_flight::{FlightInfo, Ticket};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::session::{Session, Target, Transport};

/// A Flight SQL connection carrying the session metadata on every call.
pub struct Client {
    inner: FlightSqlServiceClient<Channel>,
}

impl Client {
    /// Connect to the target, plaintext or TLS with default trust-store
    /// validation, and attach the session headers to the handle.
    pub async fn connect(target: &Target, session: &Session) -> Result<Client> {
        let uri = match target.transport {
            Transport::Plaintext => format!("http://{}", target.addr),
            Transport::Tls => format!("https://{}", target.addr),
        };
        debug!(uri = %uri, "connecting to Flight SQL endpoint");

        let mut endpoint =
            Endpoint::from_shared(uri).map_err(|e| ClientError::CreateClient(e.to_string()))?;
        if target.transport == Transport::Tls {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| ClientError::CreateClient(e.to_string()))?;
        }

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ClientError::CreateClient(e.to_string()))?;

        let mut inner = FlightSqlServiceClient::new(channel);
        for (key, value) in session.headers() {
            inner.set_header(key.clone(), value.clone());
        }

        Ok(Client { inner })
    }

    /// Lightweight capability call used to absorb first-request overhead.
    pub async fn get_catalogs(&mut self) -> Result<FlightInfo> {
        self.inner
            .get_catalogs()
            .await
            .map_err(|e| ClientError::Warmup(e.to_string()))
    }

    /// Plan a SQL statement, returning the endpoints holding its results.
    pub async fn execute(&mut self, query: &str) -> Result<FlightInfo> {
        debug!(query = %query, "executing query");

        self.inner
            .execute(query.to_string(), None)
            .await
            .map_err(|e| ClientError::Execute(e.to_string()))
    }

    /// Redeem a ticket for its record-batch stream.
    pub async fn do_get(&mut self, ticket: Ticket) -> Result<FlightRecordBatchStream> {
        self.inner
            .do_get(ticket)
            .await
            .map_err(|e| ClientError::Ticket(e.to_string()))
    }

    /// Interactive authentication is not supported; every call carries the
    /// static bearer token from the session instead.
    pub async fn handshake(&mut self, _username: &str, _password: &str) -> Result<()> {
        Err(ClientError::InteractiveAuth)
    }
}
