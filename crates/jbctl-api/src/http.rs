// HTTP/JSON management transport.
//
// Every operation is a `POST /management` carrying the JSON encoding of
// the request node. The controller answers 200 for a successful operation
// and 500 for a failed one; both bodies are operation responses and are
// handed back untouched. Only authentication and non-management replies
// become errors here.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, trace};
use url::Url;

use crate::error::Error;
use crate::model::ModelNode;
use crate::operation::{OperationRequest, ResourcePath};
use crate::transport::{ConnectParams, Session, TransportConfig, TransportFactory};

const MANAGEMENT_PATH: &str = "management";
const PROBE_ATTRIBUTE: &str = "management-major-version";

/// Opens [`HttpSession`]s against `{scheme}://host:port/management`.
///
/// The JSON wire format carries no type widths, so numeric results are
/// inferred: an integer that fits in 32 bits comes back as
/// [`ModelNode::Int`] even when the attribute is declared `LONG`, and only
/// larger values come back as [`ModelNode::Long`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// The management endpoint for a host and port.
    pub fn endpoint(&self, host: &str, port: u16) -> Result<Url, Error> {
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let url = Url::parse(&format!(
            "{}://{host}:{port}/{MANAGEMENT_PATH}",
            self.config.tls.scheme()
        ))?;
        Ok(url)
    }
}

impl TransportFactory for HttpTransport {
    fn connect(&self, params: &ConnectParams<'_>) -> Result<Box<dyn Session>, Error> {
        let url = self.endpoint(params.host, params.port)?;
        let http = self.config.build_client()?;
        let credentials = params
            .username
            .map(|user| (user.to_owned(), params.password.cloned()));

        let mut session = HttpSession {
            http,
            url,
            credentials,
            closed: false,
        };

        // Any structured reply proves the endpoint speaks the protocol.
        let probe = OperationRequest::read_attribute(ResourcePath::root(), PROBE_ATTRIBUTE);
        session.execute(&probe)?;
        info!(url = %session.url, "connected to management endpoint");

        Ok(Box::new(session))
    }
}

/// A session bound to one management endpoint.
pub struct HttpSession {
    http: reqwest::blocking::Client,
    url: Url,
    credentials: Option<(String, Option<SecretString>)>,
    closed: bool,
}

impl HttpSession {
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn parse_response(resp: reqwest::blocking::Response) -> Result<ModelNode, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("controller answered {status}"),
            });
        }

        let body = resp.text()?;
        trace!(%status, body = %body, "management response");

        if !(status.is_success() || status == reqwest::StatusCode::INTERNAL_SERVER_ERROR) {
            return Err(Error::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;
        Ok(ModelNode::from_json(&json))
    }
}

impl Session for HttpSession {
    fn execute(&mut self, request: &OperationRequest) -> Result<ModelNode, Error> {
        if self.closed {
            return Err(Error::SessionClosed);
        }
        debug!(url = %self.url, operation = %request, "POST");

        let mut builder = self
            .http
            .post(self.url.clone())
            .json(&request.to_model_node().to_json());
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, password.as_ref().map(|p| p.expose_secret()));
        }

        let resp = builder.send()?;
        Self::parse_response(resp)
    }

    fn disconnect(&mut self) {
        if !self.closed {
            debug!(url = %self.url, "closing management session");
            self.closed = true;
        }
    }
}
