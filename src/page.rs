use tracing::{debug, warn};

use crate::api::CajaApi;
use crate::caja::{CashSession, HistoryFilter};
use crate::config::{Config, SessionContext, SessionRef};
use crate::error::Result;
use crate::monitor::{monitor_view, FetchState};
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Tab {
    #[default]
    Monitor,
    History,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Monitor, Tab::History];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Monitor => "Monitor activo",
            Tab::History => "Historial de cierres",
        }
    }
}

/// Resolve the logged-in actor's current cash session.
pub fn load_context(api: &dyn CajaApi, session_ref: &SessionRef) -> Result<SessionContext> {
    let current = api.current_session(&session_ref.actor.user_id)?;
    debug!(
        user = %session_ref.actor.user_id,
        current = ?current.as_ref().map(|s| &s.id),
        "session context loaded"
    );
    Ok(SessionContext {
        actor: session_ref.actor.clone(),
        current,
        resolved: true,
    })
}

/// Like [`load_context`], but a failed lookup leaves the current session
/// unknown instead of aborting the page.
pub fn load_page_context(api: &dyn CajaApi, session_ref: &SessionRef) -> SessionContext {
    match load_context(api, session_ref) {
        Ok(context) => context,
        Err(err) => {
            warn!(error = %err, "could not resolve the current cash session");
            SessionContext::unresolved(session_ref.actor.clone())
        }
    }
}

/// Page composition: header, "open a session" offer, tab bar and tab body.
pub struct CajaPage<'a> {
    config: &'a Config,
    context: &'a SessionContext,
    tab: Tab,
}

impl<'a> CajaPage<'a> {
    pub fn new(config: &'a Config, context: &'a SessionContext, tab: Tab) -> Self {
        Self {
            config,
            context,
            tab,
        }
    }

    pub fn render(&self, api: &dyn CajaApi, filter: &HistoryFilter) -> Result<String> {
        let mut out = render::header(self.config, Some(&self.context.actor));
        out.push('\n');

        if self.context.can_open_session() {
            out.push_str(&render::open_session_offer());
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&render::tab_bar(self.tab));
        out.push_str("\n\n");

        let body = match self.tab {
            Tab::Monitor => self.monitor_section(api),
            Tab::History => self.history_section(api, filter)?,
        };
        out.push_str(&body);
        Ok(out)
    }

    /// Fetch failures are rendered inline, never returned.
    pub fn monitor_section(&self, api: &dyn CajaApi) -> String {
        let state = fetch_open_sessions(api);
        let view = monitor_view(
            &state,
            &self.context.actor,
            self.config.policy.admin_own_session,
        );
        render::monitor(&view, &self.config.display.currency())
    }

    pub fn history_section(&self, api: &dyn CajaApi, filter: &HistoryFilter) -> Result<String> {
        let page = api.closure_history(filter)?;
        Ok(render::history_table(&page, &self.config.display.currency()))
    }
}

pub fn fetch_open_sessions(api: &dyn CajaApi) -> FetchState<Vec<CashSession>> {
    let mut state = FetchState::Loading;
    let result = api.open_sessions();
    if let Err(err) = &result {
        warn!(error = %err, "failed to load open sessions");
    }
    state.receive(result);
    state
}
