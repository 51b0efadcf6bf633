//! Directory connections and the session state machine.
//!
//! A [`DirectorySession`] is owned by a single authentication attempt;
//! there is no pooling and no reuse across calls, because bind state is
//! call-scoped. The session tracks which identity it is currently bound
//! as, so the service → user → service re-bind sequence is checkable
//! instead of implicit in call order.

use std::time::Duration;

use ldap3::{DerefAliases, Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchOptions};

use crate::config::{DirectoryConfig, Protocol};
use crate::error::{LdapError, LdapResult};
use crate::search::LdapEntry;

/// LDAP resultCode for a successful operation.
const RC_SUCCESS: u32 = 0;

/// LDAP resultCode for invalidCredentials.
const RC_INVALID_CREDENTIALS: u32 = 49;

/// The identity a session is currently bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundIdentity {
    /// Fresh connection, or a previous bind failed.
    Anonymous,

    /// Bound as the provider's read-only service account.
    Service,

    /// Bound as the end user being verified.
    EndUser,
}

/// Opens a connection to the directory server described by `config`.
///
/// The connect (and TLS handshake) is bounded by the configured connect
/// timeout. For [`Protocol::StartTls`] the plaintext connection is
/// upgraded in place before this function returns. Certificate
/// validation follows `config.verify_certificates`.
pub async fn connect(config: &DirectoryConfig) -> LdapResult<DirectorySession> {
    let url = config.url();
    let mut settings = LdapConnSettings::new().set_conn_timeout(config.connect_timeout);
    if config.protocol == Protocol::StartTls {
        settings = settings.set_starttls(true);
    }
    if !config.verify_certificates {
        settings = settings.set_no_tls_verify(true);
    }

    let (conn, ldap) = LdapConnAsync::with_settings(settings, &url)
        .await
        .map_err(|e| LdapError::connection(format!("{url}: {e}")))?;

    tokio::spawn(async move {
        if let Err(e) = conn.drive().await {
            tracing::warn!(error = %e, "LDAP connection driver error");
        }
    });

    Ok(DirectorySession {
        ldap,
        bound_as: BoundIdentity::Anonymous,
        read_timeout: config.read_timeout,
    })
}

/// A live directory session, exclusively owned by one authentication
/// attempt.
///
/// Every network round trip is bounded by the configured read timeout.
/// The caller must release the session on every exit path via
/// [`DirectorySession::close`]; dropping it also tears the connection
/// down, which covers cancellation.
pub struct DirectorySession {
    ldap: Ldap,
    bound_as: BoundIdentity,
    read_timeout: Duration,
}

impl DirectorySession {
    /// The identity this session is currently bound as.
    #[must_use]
    pub const fn bound_as(&self) -> BoundIdentity {
        self.bound_as
    }

    /// Binds as the provider's service account.
    ///
    /// A rejected bind is a [`LdapError::ServiceBind`]: it indicates
    /// misconfigured service credentials, not a bad end-user credential.
    pub async fn bind_service(&mut self, config: &DirectoryConfig) -> LdapResult<()> {
        let result = self
            .ldap
            .with_timeout(self.read_timeout)
            .simple_bind(&config.bind_username, &config.bind_password)
            .await
            .map_err(op_error)?;

        if result.rc == RC_SUCCESS {
            self.bound_as = BoundIdentity::Service;
            Ok(())
        } else {
            self.bound_as = BoundIdentity::Anonymous;
            Err(LdapError::ServiceBind(format!(
                "bind as {} rejected: rc={} {}",
                config.bind_username, result.rc, result.text
            )))
        }
    }

    /// Binds as the located user entry to prove the supplied password.
    ///
    /// Any rejected bind is a [`LdapError::InvalidCredentials`];
    /// unexpected result codes are logged for operators but not
    /// surfaced. A failed bind leaves the session anonymous.
    pub async fn bind_user(&mut self, user_dn: &str, password: &str) -> LdapResult<()> {
        let result = self
            .ldap
            .with_timeout(self.read_timeout)
            .simple_bind(user_dn, password)
            .await
            .map_err(op_error)?;

        if result.rc == RC_SUCCESS {
            self.bound_as = BoundIdentity::EndUser;
            Ok(())
        } else {
            self.bound_as = BoundIdentity::Anonymous;
            if result.rc != RC_INVALID_CREDENTIALS {
                tracing::warn!(
                    user_dn = %user_dn,
                    rc = result.rc,
                    "user bind rejected with unexpected result code"
                );
            }
            Err(LdapError::InvalidCredentials)
        }
    }

    /// Runs a search with alias dereferencing disabled and returns the
    /// parsed entries.
    pub async fn search(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: Vec<&str>,
    ) -> LdapResult<Vec<LdapEntry>> {
        let (entries, _result) = self
            .ldap
            .with_timeout(self.read_timeout)
            .with_search_options(SearchOptions::new().deref(DerefAliases::Never))
            .search(base, scope, filter, attrs)
            .await
            .map_err(op_error)?
            .success()
            .map_err(|e| LdapError::Protocol(format!("search under {base} failed: {e}")))?;

        Ok(entries.into_iter().map(LdapEntry::construct).collect())
    }

    /// Unbinds and releases the connection.
    pub async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            tracing::debug!(error = %e, "LDAP unbind failed");
        }
    }
}

/// Maps a transport-level failure of an in-flight operation. These are
/// connection problems (broken pipe, timeout), not directory verdicts.
fn op_error(err: ldap3::LdapError) -> LdapError {
    LdapError::connection(err.to_string())
}
