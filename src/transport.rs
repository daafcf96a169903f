// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Submission of TSS requests over HTTP(S) with retry and failover.

The signing service is a third-party endpoint outside our control and has
a history of DNS and availability trouble, so submission cycles through a
fixed table of endpoints: the `gs.apple.com` hostname over HTTPS, two
pinned IP literals over HTTPS, then the same three over plain HTTP. TLS
peer verification is disabled because the pinned literals cannot present
a certificate valid for the hostname.

Responses are `key=value` text with an embedded XML plist on success.
`MESSAGE=SUCCESS` marks success; otherwise a numeric `STATUS=` code
determines whether the failure is fatal or worth retrying.

The whole engine is synchronous and blocking. There is no cancellation:
a caller wanting to abort mid-retry has to rely on transport timeouts or
process termination.
*/

use {
    crate::{error::TssError, request::TssRequest, response::TssResponse},
    log::{debug, error, info},
    reqwest::blocking::{Client, ClientBuilder},
    std::{io::Cursor, time::Duration},
};

/// The fixed TSS endpoint failover table.
///
/// Attempt *n* targets entry `(n - 1) % 6`, so every 6th attempt revisits
/// the primary hostname.
pub const TSS_URLS: [&str; 6] = [
    "https://gs.apple.com/TSS/controller?action=2",
    "https://17.171.36.30/TSS/controller?action=2",
    "https://17.151.36.30/TSS/controller?action=2",
    "http://gs.apple.com/TSS/controller?action=2",
    "http://17.171.36.30/TSS/controller?action=2",
    "http://17.151.36.30/TSS/controller?action=2",
];

/// Total attempt budget for one submission.
pub const TSS_MAX_ATTEMPTS: usize = 15;

/// Pause between attempts that yielded no protocol status code.
pub const TSS_RETRY_DELAY: Duration = Duration::from_secs(2);

const TSS_USER_AGENT: &str = "InetURL/1.0";

const SUCCESS_MARKER: &str = "MESSAGE=SUCCESS";
const MESSAGE_MARKER: &str = "MESSAGE=";
const STATUS_MARKER: &str = "STATUS=";
const XML_MARKER: &str = "<?xml";

/// The HTTP seam the submission loop drives.
///
/// Implemented for [reqwest::blocking::Client]; tests substitute scripted
/// doubles. Errors are transport-level diagnostic text, preserved for the
/// final failure message.
pub trait TssTransport {
    /// POST `body` to `url`, returning the full response body text.
    fn post_request(&self, url: &str, body: &str) -> Result<String, String>;
}

impl TssTransport for Client {
    fn post_request(&self, url: &str, body: &str) -> Result<String, String> {
        let response = self
            .post(url)
            .header("Cache-Control", "no-cache")
            .header("Content-Type", "text/xml; charset=\"utf-8\"")
            // Suppress 100-continue negotiation.
            .header("Expect", "")
            .body(body.to_string())
            .send()
            .map_err(|e| e.to_string())?;

        response.text().map_err(|e| e.to_string())
    }
}

/// Obtain the default [Client] to use for TSS submissions.
///
/// Certificate verification is intentionally off: the pinned IP-literal
/// fallback endpoints do not carry a certificate for `gs.apple.com`.
pub fn default_client() -> Result<Client, TssError> {
    Ok(ClientBuilder::default()
        .user_agent(TSS_USER_AGENT)
        .danger_accept_invalid_certs(true)
        .build()?)
}

/// Client for submitting signing requests to the TSS service.
pub struct TssServerClient<T = Client> {
    transport: T,
    max_attempts: usize,
    retry_delay: Duration,
}

impl TssServerClient<Client> {
    /// Construct a client using the default HTTP transport.
    pub fn new() -> Result<Self, TssError> {
        Ok(Self::with_transport(default_client()?))
    }
}

impl<T: TssTransport> TssServerClient<T> {
    /// Construct a client around an already-initialized transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            max_attempts: TSS_MAX_ATTEMPTS,
            retry_delay: TSS_RETRY_DELAY,
        }
    }

    /// Set the pause between transient-failure attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Submit a signing request, returning the parsed response.
    ///
    /// When `server_url` is given, every attempt targets it; otherwise
    /// attempts rotate through [TSS_URLS]. The loop runs until success, a
    /// fatal server status, or exhaustion of the attempt budget.
    pub fn submit(
        &self,
        request: &TssRequest,
        server_url: Option<&str>,
    ) -> Result<TssResponse, TssError> {
        let body = request.to_xml()?;
        debug!("TSS request:\n{}", body);

        let mut last_status: Option<u64> = None;
        let mut last_transport_error = String::new();
        let mut last_body = String::new();

        for attempt in 1..=self.max_attempts {
            let url = server_url.unwrap_or(TSS_URLS[(attempt - 1) % TSS_URLS.len()]);
            info!("request URL set to {}", url);
            info!("sending TSS request attempt {}", attempt);

            let response_body = match self.transport.post_request(url, &body) {
                Ok(text) => text,
                Err(text) => {
                    // No HTTP exchange at all; same treatment as a
                    // response without a status code.
                    error!("{}", text);
                    last_transport_error = text;
                    std::thread::sleep(self.retry_delay);
                    continue;
                }
            };

            if response_body.contains(SUCCESS_MARKER) {
                info!("TSS response successfully received");
                return parse_success_body(&response_body);
            }

            if !response_body.is_empty() {
                error!("TSS server returned: {}", response_body);
            }

            let status = parse_status_code(&response_body);
            last_body = response_body;

            match status {
                None => {
                    // Presumed transient; back off before the next attempt.
                    std::thread::sleep(self.retry_delay);
                }
                // 8: malformed baseband request. 49: invalid baseband
                // data (e.g. BbSNUM). 94: device not eligible for the
                // requested build. 100: malformed request.
                Some(code @ (8 | 49 | 94 | 100)) => {
                    last_status = Some(code);
                    break;
                }
                Some(code) => {
                    // Unknown server status: retry immediately, without
                    // the transient-failure backoff.
                    error!("unhandled TSS status code {}", code);
                    last_status = Some(code);
                }
            }
        }

        let message = match last_body.split_once(MESSAGE_MARKER) {
            Some((_, rest)) => rest.to_string(),
            None => last_transport_error,
        };

        error!(
            "TSS request failed (status={}, message={})",
            last_status.map_or(-1, |code| code as i64),
            message
        );

        Err(TssError::TransportFailure {
            status: last_status,
            message,
        })
    }
}

/// Extract the numeric code following `STATUS=` in a response body.
fn parse_status_code(body: &str) -> Option<u64> {
    let (_, rest) = body.split_once(STATUS_MARKER)?;

    let digits: &str = rest
        .split_once(|c: char| !c.is_ascii_digit())
        .map_or(rest, |(digits, _)| digits);

    digits.parse().ok()
}

/// Locate and parse the XML plist payload of a successful response body.
fn parse_success_body(body: &str) -> Result<TssResponse, TssError> {
    let offset = body.find(XML_MARKER).ok_or(TssError::MalformedResponse)?;

    let value = plist::Value::from_reader_xml(Cursor::new(&body.as_bytes()[offset..]))
        .map_err(TssError::PlistParseXml)?;

    let dict = value.into_dictionary().ok_or(TssError::MalformedResponse)?;

    if log::log_enabled!(log::Level::Debug) {
        let mut buffer = Vec::new();
        if plist::Value::Dictionary(dict.clone())
            .to_writer_xml(&mut buffer)
            .is_ok()
        {
            debug!("TSS response:\n{}", String::from_utf8_lossy(&buffer));
        }
    }

    Ok(TssResponse::from_dictionary(dict))
}
