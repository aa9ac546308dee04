// BrightBox 2 endpoints
//
// Login posts the MD5 digest of the admin password to `login.cgi`; the
// returned page embeds the session token as `new_urn = '...'`. That token is
// sent back as the `urn` cookie on every later request.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::parse::{RawRecord, StatusDocument, assemble_ssids, parse_device_db};
use crate::transport::{HttpTransport, Request, Transport};

/// Session cookie name.
pub const URN_COOKIE: &str = "urn";

#[allow(clippy::unwrap_used)]
static URN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"new_urn = '(.*)'").unwrap());

/// Lowercase hex MD5 of the UTF-8 password, as `login.cgi` expects it.
pub fn password_digest(password: &SecretString) -> String {
    format!("{:x}", md5::compute(password.expose_secret().as_bytes()))
}

/// Raw client for a BrightBox 2. Holds no session state; callers keep the
/// `urn` token returned by [`login`](Self::login).
#[derive(Debug, Clone)]
pub struct BrightBox2Client<T = HttpTransport> {
    transport: T,
    base_url: Url,
}

impl<T: Transport> BrightBox2Client<T> {
    /// Client for the router at `host` (`address` or `address:port`).
    pub fn new(transport: T, host: &str) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Post the credentials to `login.cgi`.
    ///
    /// Returns the session token, or `None` when the response page does not
    /// carry one (wrong credentials, lockout, unexpected page).
    pub async fn login(&self, username: &str, digest: &str) -> Result<Option<String>, Error> {
        let url = self.base_url.join("login.cgi")?;
        debug!(username, "logging in at {url}");

        let request = Request::post(url).form([
            ("usr", username),
            ("pws", digest),
            ("GO", "status.htm"),
        ]);
        let resp = self.transport.send(request).await?;

        let urn = URN_RE
            .captures(&resp.body)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_owned());
        if urn.is_none() {
            debug!(status = resp.status, "login page carried no session token");
        }
        Ok(urn)
    }

    /// End the session identified by `urn`. The response is ignored.
    pub async fn logout(&self, urn: &str) -> Result<(), Error> {
        let url = self.base_url.join("logout.cgi")?;
        debug!("logging out at {url}");

        let request = Request::post(url).cookie(URN_COOKIE, urn);
        self.transport.send(request).await?;
        Ok(())
    }

    /// Fetch and parse `status_conn.xml`.
    pub async fn status_document(&self, urn: &str) -> Result<StatusDocument, Error> {
        let url = self.base_url.join("status_conn.xml")?;
        debug!("fetching status document from {url}");

        let request = Request::get(url.clone()).cookie(URN_COOKIE, urn);
        let resp = self.transport.send(request).await?;
        if !resp.is_success() {
            return Err(Error::Status {
                status: resp.status,
                url: url.to_string(),
            });
        }

        Ok(StatusDocument::parse(&resp.body)?)
    }

    /// Device records from the status document's `deviceDB` blob.
    pub async fn known_devices(&self, urn: &str) -> Result<Vec<RawRecord>, Error> {
        let doc = self.status_document(urn).await?;
        Ok(parse_device_db(doc.device_db()?))
    }

    /// SSID records assembled from the status document's `ssid_*` elements.
    pub async fn ssids(&self, urn: &str) -> Result<Vec<RawRecord>, Error> {
        let doc = self.status_document(urn).await?;
        Ok(assemble_ssids(&doc)?)
    }
}
