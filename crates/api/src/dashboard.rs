// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard and audit log views.

use prf_domain::SupervisorLevels;
use prf_domain::permissions::codes;
use prf_persistence::{AuditLogData, DashboardCounts, ListFilter, Persistence};
use tracing::debug;

use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::pages::{all_pages, can_view};
use crate::rbac::supervisor_levels_for;

/// Most recent audit entries shown on the audit page.
pub const AUDIT_PAGE_LIMIT: i64 = 500;

/// A navigation link to a page the session may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub slug: &'static str,
    pub title: &'static str,
}

/// What the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub counts: DashboardCounts,
    pub supervisor: SupervisorLevels,
    pub links: Vec<NavLink>,
}

/// Navigation links for every page the session may view.
#[must_use]
pub fn navigation(ctx: &SessionContext) -> Vec<NavLink> {
    let mut links: Vec<NavLink> = all_pages()
        .into_iter()
        .filter(|page| can_view(*page, ctx))
        .map(|page| NavLink {
            slug: page.slug(),
            title: page.title(),
        })
        .collect();
    if ctx.can(codes::AUDIT_VIEW) {
        links.push(NavLink {
            slug: "audit",
            title: "Audit Log",
        });
    }
    links
}

/// Loads the dashboard for a signed-in user.
///
/// # Errors
///
/// Returns an error if the headline counts cannot be read.
pub fn dashboard(
    persistence: &mut Persistence,
    ctx: &SessionContext,
) -> Result<DashboardView, ApiError> {
    let counts: DashboardCounts = persistence.dashboard_counts()?;
    let supervisor: SupervisorLevels = supervisor_levels_for(persistence, &ctx.user);
    debug!(
        user_id = ctx.user.id,
        is_supervisor = supervisor.is_supervisor(),
        "Dashboard loaded"
    );
    Ok(DashboardView {
        counts,
        supervisor,
        links: navigation(ctx),
    })
}

/// Lists recent audit entries, newest first.
///
/// # Errors
///
/// Returns `Unauthorized` without `audit.view`, or an error if the query fails.
pub fn audit_log(
    persistence: &mut Persistence,
    ctx: &SessionContext,
    search: Option<String>,
) -> Result<Vec<AuditLogData>, ApiError> {
    ctx.require(codes::AUDIT_VIEW)?;
    let filter: ListFilter = ListFilter {
        search,
        active: None,
    };
    Ok(persistence.list_audit_log(&filter, AUDIT_PAGE_LIMIT)?)
}
