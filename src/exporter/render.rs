use super::{
    ExportOptions,
    literal::{Literal, ObjectBuilder, Style, quote, resource_name},
};
use crate::grafana::alert::{Alert, AlertData, AlertModel, Condition};
use std::fmt::{self, Write};

const STEP: usize = 2;

/// Render the complete document.
///
/// One function per shape of the alert model, written in a fixed order: folder,
/// rule group, the single rule, then one `data` block per query.
pub(super) fn document(alert: &Alert, options: &ExportOptions) -> Result<String, fmt::Error> {
    let folder_id = resource_name(options.folder_title());
    let group_id = resource_name(options.rule_group());

    let mut out = String::new();
    folder(&mut out, &folder_id, options.folder_title())?;
    out.push('\n');
    rule_group(&mut out, alert, options, &folder_id, &group_id)?;

    Ok(out)
}

fn folder(out: &mut String, id: &str, title: &str) -> fmt::Result {
    writeln!(out, "resource \"grafana_folder\" {} {{", quote(id))?;
    attribute(out, STEP, "title", &Literal::string(title))?;
    writeln!(out, "}}")
}

fn rule_group(
    out: &mut String,
    alert: &Alert,
    options: &ExportOptions,
    folder_id: &str,
    group_id: &str,
) -> fmt::Result {
    writeln!(out, "resource \"grafana_rule_group\" {} {{", quote(group_id))?;
    attribute(out, STEP, "name", &Literal::string(options.rule_group()))?;
    writeln!(
        out,
        "{:width$}folder_uid = grafana_folder.{}.uid",
        "",
        folder_id,
        width = STEP
    )?;
    attribute(
        out,
        STEP,
        "interval_seconds",
        &Literal::Number(options.interval_seconds().into()),
    )?;
    rule(out, alert, STEP)?;
    writeln!(out, "}}")
}

fn rule(out: &mut String, alert: &Alert, indent: usize) -> fmt::Result {
    let inner = indent + STEP;

    open_block(out, indent, "rule")?;
    attribute(out, inner, "name", &Literal::string(&alert.title))?;
    attribute(out, inner, "for", &Literal::string(&alert.for_duration))?;
    attribute(out, inner, "condition", &Literal::string(&alert.condition))?;
    attribute(
        out,
        inner,
        "no_data_state",
        &Literal::string(alert.no_data_state.as_str()),
    )?;
    attribute(
        out,
        inner,
        "exec_err_state",
        &Literal::string(alert.exec_err_state.as_str()),
    )?;
    attribute(out, inner, "annotations", &Literal::map(&alert.annotations))?;
    attribute(out, inner, "labels", &Literal::map(&alert.labels))?;
    attribute(out, inner, "is_paused", &Literal::Bool(alert.is_paused))?;

    for entry in &alert.data {
        data(out, entry, inner)?;
    }

    close_block(out, indent)
}

fn data(out: &mut String, entry: &AlertData, indent: usize) -> fmt::Result {
    let inner = indent + STEP;

    open_block(out, indent, "data")?;
    attribute(out, inner, "ref_id", &Literal::string(&entry.ref_id))?;
    attribute(out, inner, "query_type", &Literal::string(&entry.query_type))?;

    open_block(out, inner, "relative_time_range")?;
    attribute(
        out,
        inner + STEP,
        "from",
        &Literal::integer(entry.relative_time_range.from),
    )?;
    attribute(
        out,
        inner + STEP,
        "to",
        &Literal::integer(entry.relative_time_range.to),
    )?;
    close_block(out, inner)?;

    attribute(
        out,
        inner,
        "datasource_uid",
        &Literal::string(&entry.datasource_uid),
    )?;

    write!(out, "{:width$}model = jsonencode(", "", width = inner)?;
    model(&entry.model).write_to(out, Style::Json, inner)?;
    writeln!(out, ")")?;

    close_block(out, indent)
}

/// The query payload as the object passed to `jsonencode`
pub(super) fn model(model: &AlertModel) -> Literal {
    let datasource = ObjectBuilder::new()
        .field("type", Literal::string(&model.datasource.kind))
        .field("uid", Literal::string(&model.datasource.uid))
        .build();

    ObjectBuilder::new()
        .field("datasource", datasource)
        .field("dimensions", Literal::map(&model.dimensions))
        .optional("expression", &model.expression)
        .field("hide", Literal::Bool(model.hide))
        .optional("id", &model.id)
        .field("intervalMs", Literal::integer(model.interval_ms))
        .optional("label", &model.label)
        .field("logGroups", Literal::strings(&model.log_groups))
        .field("matchExact", Literal::Bool(model.match_exact))
        .field("maxDataPoints", Literal::integer(model.max_data_points))
        .field("metricEditorMode", Literal::integer(model.metric_editor_mode))
        .optional("metricName", &model.metric_name)
        .field("metricQueryType", Literal::integer(model.metric_query_type))
        .optional("namespace", &model.namespace)
        .optional("period", &model.period)
        .optional("queryMode", &model.query_mode)
        .field("refId", Literal::string(&model.ref_id))
        .optional("reducer", &model.reducer)
        .optional("region", &model.region)
        .optional("sqlExpression", &model.sql_expression)
        .optional("statistic", &model.statistic)
        .field(
            "conditions",
            Literal::List(model.conditions.iter().map(condition).collect()),
        )
        .optional("type", &model.kind)
        .build()
}

fn condition(condition: &Condition) -> Literal {
    let evaluator = ObjectBuilder::new()
        .field(
            "params",
            Literal::List(condition.evaluator.params.iter().map(Literal::from).collect()),
        )
        .field("type", Literal::string(&condition.evaluator.kind))
        .build();
    let operator = ObjectBuilder::new()
        .field("type", Literal::string(&condition.operator.kind))
        .build();
    let query = ObjectBuilder::new()
        .field("params", Literal::strings(&condition.query.params))
        .build();
    let reducer = ObjectBuilder::new()
        .field(
            "params",
            Literal::List(condition.reducer.params.iter().map(Literal::from).collect()),
        )
        .field("type", Literal::string(&condition.reducer.kind))
        .build();

    ObjectBuilder::new()
        .field("evaluator", evaluator)
        .field("operator", operator)
        .field("query", query)
        .field("reducer", reducer)
        .field("type", Literal::string(&condition.kind))
        .build()
}

fn open_block(out: &mut String, indent: usize, name: &str) -> fmt::Result {
    writeln!(out, "{:width$}{} {{", "", name, width = indent)
}

fn close_block(out: &mut String, indent: usize) -> fmt::Result {
    writeln!(out, "{:width$}}}", "", width = indent)
}

fn attribute(out: &mut String, indent: usize, name: &str, value: &Literal) -> fmt::Result {
    write!(out, "{:width$}{} = ", "", name, width = indent)?;
    value.write_to(out, Style::Hcl, indent)?;
    out.push('\n');
    Ok(())
}
