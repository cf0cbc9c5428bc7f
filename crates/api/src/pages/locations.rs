// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prf_domain::permissions::codes;
use prf_persistence::{ListFilter, LocationData, LocationFields, Persistence};

use super::{CrudPage, Mutation, TableRow, active_row_actions, or_blank, set_opt, yes_no};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{FieldKind, FieldSpec, FormFields};

pub struct LocationsPage;

impl LocationsPage {
    fn parse(form: &FormFields) -> Result<LocationFields, ApiError> {
        Ok(LocationFields {
            location_code: form.required_text("location_code", 50)?,
            location_name: form.required_text("location_name", 150)?,
            location_type: form.optional_text("location_type", 50)?,
            address: form.optional_text("address", 255)?,
            phone: form.optional_text("phone", 50)?,
            district: form.optional_text("district", 100)?,
        })
    }
}

impl CrudPage for LocationsPage {
    fn slug(&self) -> &'static str {
        "locations"
    }

    fn title(&self) -> &'static str {
        "Locations"
    }

    fn view_permission(&self) -> &'static str {
        codes::LOCATIONS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::LOCATIONS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Code", "Name", "Type", "District", "Phone", "Active"]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, _persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        Ok(vec![
            FieldSpec::new("location_code", "Code", FieldKind::Text).required(),
            FieldSpec::new("location_name", "Name", FieldKind::Text).required(),
            FieldSpec::new("location_type", "Type", FieldKind::Text),
            FieldSpec::new("address", "Address", FieldKind::TextArea),
            FieldSpec::new("phone", "Phone", FieldKind::Text),
            FieldSpec::new("district", "District", FieldKind::Text),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let locations: Vec<LocationData> = persistence.list_locations(filter)?;
        Ok(locations
            .into_iter()
            .map(|l| TableRow {
                id: l.location_id,
                cells: vec![
                    l.location_id.to_string(),
                    l.location_code,
                    l.location_name,
                    or_blank(l.location_type.as_deref()),
                    or_blank(l.district.as_deref()),
                    or_blank(l.phone.as_deref()),
                    yes_no(l.is_active),
                ],
                is_active: Some(l.is_active),
                actions: active_row_actions(),
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_location(id)?.map(|l| {
            let mut form: FormFields = [
                ("location_code", l.location_code),
                ("location_name", l.location_name),
            ]
            .into_iter()
            .collect();
            set_opt(&mut form, "location_type", l.location_type);
            set_opt(&mut form, "address", l.address);
            set_opt(&mut form, "phone", l.phone);
            set_opt(&mut form, "district", l.district);
            form
        }))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let fields: LocationFields = Self::parse(form)?;
        let id: i64 = persistence.create_location(&fields, Some(ctx.user.id))?;
        Ok(Mutation::new("create", id).with_details(format!(
            "Created location {} ({})",
            fields.location_code, fields.location_name
        )))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let fields: LocationFields = Self::parse(form)?;
        persistence.update_location(id, &fields)?;
        Ok(Mutation::new("update", id).with_details(fields.location_code))
    }

    fn toggle(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let active: bool = persistence.toggle_location(id)?;
        Ok(Mutation::new("toggle", id).with_details(format!("is_active={active}")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_location(id)?;
        Ok(Mutation::new("delete", id))
    }
}
