// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use prf_domain::AssetStatus;
use prf_domain::permissions::codes;
use prf_persistence::{AssetData, AssetFields, AssignmentHistoryData, ListFilter, Persistence};

use super::{CrudPage, Mutation, RowAction, TableRow, lookup, to_choices};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{Choice, FieldKind, FieldSpec, FormFields};

pub struct AssetsPage;

impl AssetsPage {
    /// Every status. Choosing `Assigned` by hand is rejected on save, but an
    /// assigned asset's edit form must be able to show it.
    fn status_choices() -> Vec<Choice> {
        AssetStatus::ALL
            .into_iter()
            .map(|status| (status.as_str().to_string(), status.as_str().to_string()))
            .collect()
    }

    /// Parses the form into fields plus the requested status, if one was chosen.
    fn parse(form: &FormFields) -> Result<(AssetFields, Option<AssetStatus>), ApiError> {
        let fields: AssetFields = AssetFields {
            asset_tag: form.required_text("asset_tag", 50)?,
            asset_name: form.required_text("asset_name", 150)?,
            category_id: form.required_id("category_id")?,
            status: String::new(),
        };
        let status: Option<AssetStatus> = match form.get("status").map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<AssetStatus>()?),
        };
        Ok((fields, status))
    }

    fn assigned_by_hand() -> ApiError {
        ApiError::rule(
            "asset_status",
            "Assets become Assigned through the Assignments page",
        )
    }

    fn category_names(persistence: &mut Persistence) -> Result<HashMap<i64, String>, ApiError> {
        Ok(persistence
            .list_asset_categories(&ListFilter::default())?
            .into_iter()
            .map(|c| (c.category_id, c.category_name))
            .collect())
    }
}

impl CrudPage for AssetsPage {
    fn slug(&self) -> &'static str {
        "assets"
    }

    fn title(&self) -> &'static str {
        "Assets"
    }

    fn view_permission(&self) -> &'static str {
        codes::ASSETS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::ASSETS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &[
            "ID",
            "Tag",
            "Name",
            "Category",
            "Status",
            "Holder",
            "Location",
            "Last movement",
        ]
    }

    fn fields(&self, persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        let categories: HashMap<i64, String> = Self::category_names(persistence)?;
        Ok(vec![
            FieldSpec::new("asset_tag", "Asset tag", FieldKind::Text).required(),
            FieldSpec::new("asset_name", "Name", FieldKind::Text).required(),
            FieldSpec::new(
                "category_id",
                "Category",
                FieldKind::Select(to_choices(&categories)),
            )
            .required(),
            FieldSpec::new(
                "status",
                "Status",
                FieldKind::Select(Self::status_choices()),
            ),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let all: ListFilter = ListFilter::default();
        let categories: HashMap<i64, String> = Self::category_names(persistence)?;
        let employees: HashMap<i64, String> = persistence
            .list_employees(&all)?
            .into_iter()
            .map(|e| (e.employee_id, e.full_name()))
            .collect();
        let locations: HashMap<i64, String> = persistence
            .list_locations(&all)?
            .into_iter()
            .map(|l| (l.location_id, l.location_code))
            .collect();

        let assets: Vec<AssetData> = persistence.list_assets(filter)?;
        let mut rows: Vec<TableRow> = Vec::with_capacity(assets.len());
        for a in assets {
            let history: Vec<AssignmentHistoryData> =
                persistence.get_assignment_history_for_asset(a.asset_id)?;
            let last_movement: String = history
                .last()
                .map(|h| format!("{} {}", h.event, h.occurred_at))
                .unwrap_or_default();
            rows.push(TableRow {
                id: a.asset_id,
                cells: vec![
                    a.asset_id.to_string(),
                    a.asset_tag,
                    a.asset_name,
                    lookup(&categories, Some(a.category_id)),
                    a.status,
                    lookup(&employees, a.current_holder_employee_id),
                    lookup(&locations, a.current_location_id),
                    last_movement,
                ],
                is_active: None,
                actions: vec![RowAction::DELETE],
            });
        }
        Ok(rows)
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_asset(id)?.map(|a| {
            [
                ("asset_tag", a.asset_tag),
                ("asset_name", a.asset_name),
                ("category_id", a.category_id.to_string()),
                ("status", a.status),
            ]
            .into_iter()
            .collect()
        }))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let (mut fields, requested) = Self::parse(form)?;
        let status: AssetStatus = match requested {
            Some(AssetStatus::Assigned) => return Err(Self::assigned_by_hand()),
            Some(status) => status,
            None => AssetStatus::Available,
        };
        fields.status = status.as_str().to_string();
        let id: i64 = persistence.create_asset(&fields)?;
        Ok(Mutation::new("create", id).with_details(format!(
            "Created asset {} ({})",
            fields.asset_tag, fields.status
        )))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let (mut fields, requested) = Self::parse(form)?;
        let current: AssetData = persistence
            .get_asset(id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Asset"),
                message: format!("asset {id}"),
            })?;
        let assigned: bool = persistence.get_active_assignment_id(id)?.is_some();

        // an assigned asset only leaves Assigned through a return
        let status: String = match (assigned, requested) {
            (true, None | Some(AssetStatus::Assigned)) => {
                AssetStatus::Assigned.as_str().to_string()
            }
            (true, Some(_)) => {
                return Err(ApiError::rule(
                    "asset_status",
                    "Return the asset before changing its status",
                ));
            }
            (false, Some(AssetStatus::Assigned)) => return Err(Self::assigned_by_hand()),
            (false, Some(status)) => status.as_str().to_string(),
            (false, None) => current.status,
        };
        fields.status = status;
        persistence.update_asset(id, &fields)?;
        Ok(Mutation::new("update", id)
            .with_details(format!("{} ({})", fields.asset_tag, fields.status)))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_asset(id)?;
        Ok(Mutation::new("delete", id))
    }
}
