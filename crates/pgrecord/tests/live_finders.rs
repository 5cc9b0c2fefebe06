//! Finders and raw helpers against a real database.
//!
//! Each test is skipped when `DATABASE_URL` is not set.

use pgrecord::{
    BindMap, ConditionMap, Conditions, FromRow, Model, OrmError, OrmResult, RowExt, Value, binds,
    raw,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::{Client, NoTls};

#[derive(Debug, PartialEq)]
struct Widget {
    id: i64,
    name: String,
    status: i32,
}

impl FromRow for Widget {
    fn from_row(row: &tokio_postgres::Row) -> OrmResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            status: row.try_get_column("status")?,
        })
    }
}

// Created per connection as a temp table in `try_connect`.
impl Model for Widget {
    const TABLE: &'static str = "pgrecord_widgets";
}

async fn try_connect(test: &str) -> OrmResult<Option<Client>> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(OrmError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    raw::sql_execute(
        &client,
        "CREATE TEMP TABLE pgrecord_widgets (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            status INT NOT NULL,
            meta JSONB
        )",
        BindMap::new(),
    )
    .await?;
    raw::sql_execute(
        &client,
        "INSERT INTO pgrecord_widgets (name, status, meta) VALUES
            ('alpha', 1, '{\"tags\": {\"color\": \"red\"}}'),
            ('beta', 1, NULL),
            ('gamma', 0, NULL),
            ('delta', 2, NULL)",
        BindMap::new(),
    )
    .await?;
    Ok(Some(client))
}

fn names(widgets: &[Widget]) -> Vec<&str> {
    widgets.iter().map(|w| w.name.as_str()).collect()
}

#[tokio::test]
async fn find_simple_with_condition_map() -> OrmResult<()> {
    let Some(client) = try_connect("find_simple_with_condition_map").await? else {
        return Ok(());
    };

    let widgets = Widget::find_simple(
        &client,
        ConditionMap::new().eq("status", 1).like("name", "%a"),
        BindMap::new(),
    )
    .await?;
    assert_eq!(names(&widgets), ["alpha", "beta"]);

    let widgets =
        Widget::find_simple(&client, ConditionMap::new().gt("status", 0), BindMap::new()).await?;
    assert_eq!(widgets.len(), 3);
    Ok(())
}

#[tokio::test]
async fn raw_filter_with_array_placeholder() -> OrmResult<()> {
    let Some(client) = try_connect("raw_filter_with_array_placeholder").await? else {
        return Ok(());
    };

    let widgets = Widget::find_simple(
        &client,
        "id IN ({ids:array}) AND status <> :skip:",
        binds! { "ids" => vec![1_i64, 3, 4], "skip" => 0 },
    )
    .await?;
    assert_eq!(names(&widgets), ["alpha", "delta"]);

    let count = Widget::count_simple(
        &client,
        "id IN ({ids:array})",
        binds! { "ids" => Vec::<i64>::new() },
    )
    .await?;
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn first_count_and_by_id() -> OrmResult<()> {
    let Some(client) = try_connect("first_count_and_by_id").await? else {
        return Ok(());
    };

    assert_eq!(Widget::count_simple(&client, (), BindMap::new()).await?, 4);
    assert_eq!(
        Widget::count_simple(&client, ConditionMap::new().eq("status", 1), BindMap::new()).await?,
        2
    );

    let first = Widget::find_first_simple(&client, "status = :s:", binds! { "s" => 2 }).await?;
    assert_eq!(first.map(|w| w.name), Some("delta".to_string()));

    let found = Widget::find_by_id(&client, 2_i64).await?;
    assert_eq!(found.map(|w| w.name), Some("beta".to_string()));
    assert!(Widget::find_by_id(&client, 999_i64).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn json_conditions_keep_order() -> OrmResult<()> {
    let Some(client) = try_connect("json_conditions_keep_order").await? else {
        return Ok(());
    };

    let conditions = Conditions::from_json(serde_json::json!({
        "status": 1,
        "name": ["<>", "alpha"],
    }))?;
    let widgets = Widget::find_simple(&client, conditions, BindMap::new()).await?;
    assert_eq!(names(&widgets), ["beta"]);
    Ok(())
}

#[tokio::test]
async fn build_errors_surface_before_querying() -> OrmResult<()> {
    let Some(client) = try_connect("build_errors_surface_before_querying").await? else {
        return Ok(());
    };

    let err = Widget::find_simple(&client, "id IN ({ids:array})", binds! { "ids" => 5 })
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::ArrayPlaceholderTypeMismatch { .. }));

    let err = Widget::find_simple(&client, "id = :missing:", BindMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::UnresolvedPlaceholder { .. }));

    let err = Widget::find_simple(&client, ConditionMap::new().eq("id", 1), binds! { "x" => 1 })
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::InvalidConditionShape(_)));
    Ok(())
}

#[tokio::test]
async fn raw_helpers_return_records() -> OrmResult<()> {
    let Some(client) = try_connect("raw_helpers_return_records").await? else {
        return Ok(());
    };

    let rows = raw::sql_fetch_all(
        &client,
        "SELECT id, name, meta FROM pgrecord_widgets WHERE name = :name:",
        binds! { "name" => "alpha" },
    )
    .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), Some(&Value::Int(1)));
    assert_eq!(rows[0].get_path("meta.tags.color"), Some(Value::Text("red".into())));

    let missing = raw::sql_fetch_one(
        &client,
        "SELECT id FROM pgrecord_widgets WHERE id = :id:",
        binds! { "id" => 404_i64 },
    )
    .await?;
    assert!(missing.is_none());

    let total =
        raw::sql_fetch_column(&client, "SELECT COUNT(*) FROM pgrecord_widgets", BindMap::new())
            .await?;
    assert_eq!(total, Some(Value::Int(4)));

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let name = format!("widget-{nanos}");
    let inserted = raw::sql_execute(
        &client,
        "INSERT INTO pgrecord_widgets (name, status) VALUES (:name:, :status:)",
        binds! { "name" => name.as_str(), "status" => 3 },
    )
    .await?;
    assert_eq!(inserted, 1);

    let typed: Option<Widget> = raw::sql_fetch_one_as(
        &client,
        "SELECT id, name, status FROM pgrecord_widgets WHERE name = :name:",
        binds! { "name" => name.as_str() },
    )
    .await?;
    assert_eq!(typed.map(|w| w.status), Some(3));
    Ok(())
}

#[tokio::test]
async fn helpers_run_inside_a_transaction() -> OrmResult<()> {
    let Some(mut client) = try_connect("helpers_run_inside_a_transaction").await? else {
        return Ok(());
    };

    let tx = client.transaction().await?;
    raw::sql_execute(
        &tx,
        "DELETE FROM pgrecord_widgets WHERE status IN ({s:array})",
        binds! { "s" => vec![0, 2] },
    )
    .await?;
    assert_eq!(Widget::count_simple(&tx, (), BindMap::new()).await?, 2);
    tx.rollback().await?;

    assert_eq!(Widget::count_simple(&client, (), BindMap::new()).await?, 4);
    Ok(())
}

#[tokio::test]
async fn fetch_one_reads_only_the_first_row() -> OrmResult<()> {
    let Some(client) = try_connect("fetch_one_reads_only_the_first_row").await? else {
        return Ok(());
    };

    let first = raw::sql_fetch_one(
        &client,
        "SELECT n FROM generate_series(1, :upto:) AS n",
        binds! { "upto" => 1_000_000 },
    )
    .await?;
    assert_eq!(first.and_then(|r| r.get("n").cloned()), Some(Value::Int(1)));

    let column = raw::sql_fetch_column(
        &client,
        "SELECT n FROM generate_series(5, 1000000) AS n",
        BindMap::new(),
    )
    .await?;
    assert_eq!(column, Some(Value::Int(5)));

    // The connection stays usable after abandoning the rest of the stream.
    assert_eq!(Widget::count_simple(&client, (), BindMap::new()).await?, 4);
    Ok(())
}
