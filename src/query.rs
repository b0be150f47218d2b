//! Query execution and result streaming.

use std::io::Write;
use std::time::{Duration, Instant};

use arrow_flight::FlightInfo;
use futures::TryStreamExt;
use tracing::debug;

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::table::Table;
use crate::timings::Timings;

/// Execute `sql`, stream every resulting endpoint into a table on `w`, and
/// report the time spent in each phase.
///
/// An execute failure aborts before any output. Once fetching has started,
/// whatever was gathered is rendered even when a later batch fails; the
/// error is propagated after the flush.
pub async fn print_query<W: Write>(client: &mut Client, w: &mut W, sql: &str) -> Result<Timings> {
    let before_execute = Instant::now();
    let info = client.execute(sql).await?;
    let execute = before_execute.elapsed();
    debug!(endpoints = info.endpoint.len(), "query planned");

    let mut table = Table::new();
    let fetched = fetch_endpoints(client, &info, &mut table).await;

    // render before inspecting the fetch result so partial results flush
    table.render(w)?;
    let do_get = fetched?;

    Ok(Timings {
        execute,
        do_get,
        ..Timings::default()
    })
}

/// Drain every endpoint's ticketed stream into the table, accumulating the
/// time spent opening the streams into one total.
async fn fetch_endpoints(
    client: &mut Client,
    info: &FlightInfo,
    table: &mut Table,
) -> Result<Duration> {
    let mut do_get = Duration::ZERO;

    for endpoint in &info.endpoint {
        let ticket = endpoint
            .ticket
            .clone()
            .ok_or_else(|| ClientError::Ticket("endpoint carries no ticket".into()))?;

        let before_do_get = Instant::now();
        let mut stream = client.do_get(ticket).await?;
        do_get += before_do_get.elapsed();

        // exhausting the stream is normal end-of-stream, not a failure
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| ClientError::Fetch(e.to_string()))?
        {
            table.push_batch(&batch)?;
        }

        debug!(rows = table.row_count(), "endpoint drained");
    }

    Ok(do_get)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::{parse_target, Session};
    use crate::test_utils;

    async fn connect() -> Client {
        let url = test_utils::serve_mock().await;
        let target = parse_target(&url).unwrap();
        let session = Session::new("testdb", "secret");

        Client::connect(&target, &session).await.unwrap()
    }

    #[tokio::test]
    async fn test_print_query_renders_table_and_timings() {
        let mut client = connect().await;
        let mut out = Vec::new();

        let timings = print_query(&mut client, &mut out, "SELECT * FROM t")
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(
            "name | value\n\
             -----+------\n\
             a    | 1\n\
             b    | 2\n"
        ));
        assert_eq!(timings.warmup, Duration::ZERO);
        assert!(timings.execute > Duration::ZERO);
        assert!(timings.do_get > Duration::ZERO);
        assert_eq!(timings.total(), timings.execute + timings.do_get);
    }

    #[tokio::test]
    async fn test_execute_failure_prints_nothing() {
        let mut client = connect().await;
        let mut out = Vec::new();

        let result = print_query(&mut client, &mut out, test_utils::FAILING_QUERY).await;

        assert!(matches!(result, Err(ClientError::Execute(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_warmup_call_succeeds() {
        let mut client = connect().await;

        assert!(client.get_catalogs().await.is_ok());
    }

    #[tokio::test]
    async fn test_handshake_is_not_implemented() {
        let mut client = connect().await;

        assert_eq!(
            client.handshake("user", "password").await.unwrap_err(),
            ClientError::InteractiveAuth
        );
    }
}
