//! In-memory collaborators for tests, exported for the integration tests.

use crate::error::SyncError;
use crate::models::{Href, IpList, ProvisioningOutcome, RangeCollection};
use crate::pce::PolicyController;
use crate::zscaler::RemoteRangeSource;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Remote source returning a fixed list, or a fixed error.
pub struct MockSource {
    result: Result<Vec<String>, SyncError>,
    fetches: Mutex<usize>,
}

impl MockSource {
    pub fn new(ranges: &[&str]) -> Self {
        MockSource {
            result: Ok(ranges.iter().map(|r| r.to_string()).collect()),
            fetches: Mutex::new(0),
        }
    }

    pub fn failing(err: SyncError) -> Self {
        MockSource {
            result: Err(err),
            fetches: Mutex::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

impl RemoteRangeSource for MockSource {
    async fn fetch(&self) -> Result<Vec<String>, SyncError> {
        *self.fetches.lock().unwrap() += 1;
        self.result.clone()
    }
}

/// One recorded controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerCall {
    Find(String),
    Create {
        name: String,
        ranges: Vec<String>,
        description: String,
    },
    Update {
        href: Href,
        ranges: Vec<String>,
    },
    Provision(Vec<Href>),
}

/// Policy controller backed by a Vec, recording every call.
#[derive(Default)]
pub struct MockController {
    lists: Mutex<Vec<IpList>>,
    calls: Mutex<Vec<ControllerCall>>,
    write_error: Option<String>,
    provision_error: Option<String>,
}

impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lists(lists: Vec<IpList>) -> Self {
        MockController {
            lists: Mutex::new(lists),
            ..Default::default()
        }
    }

    /// Make create and update fail with [`SyncError::Write`].
    pub fn fail_writes(mut self, msg: &str) -> Self {
        self.write_error = Some(msg.to_string());
        self
    }

    /// Make provision fail with [`SyncError::Provision`].
    pub fn fail_provision(mut self, msg: &str) -> Self {
        self.provision_error = Some(msg.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ControllerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Current stored state of the list with this href.
    pub fn list(&self, href: &Href) -> Option<IpList> {
        self.lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| &l.href == href)
            .cloned()
    }

    fn record(&self, call: ControllerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PolicyController for MockController {
    async fn find_by_name(&self, name: &str) -> Result<Vec<IpList>, SyncError> {
        self.record(ControllerCall::Find(name.to_string()));
        // Partial, case-insensitive match like the PCE name filter
        let needle = name.to_lowercase();
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        name: &str,
        ranges: &RangeCollection,
        description: &str,
    ) -> Result<IpList, SyncError> {
        self.record(ControllerCall::Create {
            name: name.to_string(),
            ranges: ranges.to_strings(),
            description: description.to_string(),
        });
        if let Some(msg) = &self.write_error {
            return Err(SyncError::Write(msg.clone()));
        }
        let mut lists = self.lists.lock().unwrap();
        let list = IpList {
            href: Href::new(format!(
                "/orgs/1/sec_policy/draft/ip_lists/{}",
                lists.len() + 100
            )),
            name: name.to_string(),
            description: Some(description.to_string()),
            ranges: ranges.clone(),
        };
        lists.push(list.clone());
        Ok(list)
    }

    async fn update(&self, href: &Href, ranges: &RangeCollection) -> Result<IpList, SyncError> {
        self.record(ControllerCall::Update {
            href: href.clone(),
            ranges: ranges.to_strings(),
        });
        if let Some(msg) = &self.write_error {
            return Err(SyncError::Write(msg.clone()));
        }
        let mut lists = self.lists.lock().unwrap();
        let list = lists
            .iter_mut()
            .find(|l| &l.href == href)
            .ok_or_else(|| SyncError::Write(format!("404 Not Found: {href}")))?;
        list.ranges = ranges.clone();
        Ok(list.clone())
    }

    async fn provision(&self, hrefs: &HashSet<Href>) -> Result<ProvisioningOutcome, SyncError> {
        let mut scope: Vec<Href> = hrefs.iter().cloned().collect();
        scope.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        self.record(ControllerCall::Provision(scope));
        match &self.provision_error {
            Some(msg) => Err(SyncError::Provision(msg.clone())),
            None => Ok(ProvisioningOutcome {
                version: 7,
                workloads_affected: 3,
            }),
        }
    }
}

/// A request received by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line, e.g. `PUT /api/v2/orgs/1/sec_policy/draft/ip_lists/42 HTTP/1.1`.
    pub line: String,
    pub body: String,
}

/// Local HTTP server answering one connection per canned `(status, body)` response,
/// in order, then closing.
pub struct CannedServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CannedServer {
    pub async fn start(responses: Vec<(u16, &str)>) -> CannedServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let responses: Vec<(u16, String)> = responses
            .into_iter()
            .map(|(status, body)| (status, body.to_string()))
            .collect();

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                seen.lock().unwrap().push(request);
                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        CannedServer { addr, requests }
    }

    /// `http://127.0.0.1:<port>`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut expected = None;
    loop {
        if let Some(total) = expected {
            if buf.len() >= total {
                break;
            }
        }
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if expected.is_none() {
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                expected = Some(end + 4 + content_length(&head));
            }
        }
    }

    let text = String::from_utf8_lossy(&buf).to_string();
    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    RecordedRequest {
        line: head.lines().next().unwrap_or_default().to_string(),
        body: body.to_string(),
    }
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
