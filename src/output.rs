use tabled::settings::Style;
use tabled::{Table, Tabled};

use sgtv::plan::{Plan, PlanAction};
use sgtv::resource::RESOURCE_TYPE;

#[derive(Tabled)]
struct ChangeRow {
    attribute: &'static str,
    old: String,
    new: String,
    #[tabled(rename = "forces replacement")]
    forces_replacement: &'static str,
}

pub fn render_plan(plan: &Plan) -> String {
    let header = match plan.action {
        PlanAction::NoOp => return format!("{}: no changes", RESOURCE_TYPE),
        action => format!("{} will be {}d", RESOURCE_TYPE, action),
    };

    let rows = plan.changes.iter().map(|change| ChangeRow {
        attribute: change.attribute,
        old: change.old.clone(),
        new: change.new.clone(),
        forces_replacement: if change.forces_replacement { "yes" } else { "" },
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    format!("{}\n{}", header, table)
}
