use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="refresh" content="3; url=/api/docs">
    <title>Item CRUD Lab</title>
    <style>
        body { font-family: system-ui, sans-serif; background: #16213e; color: #e6e6e6;
               min-height: 100vh; margin: 0; display: flex; align-items: center; justify-content: center; }
        main { text-align: center; }
        a { color: #4fc3f7; margin: 0 0.5rem; }
    </style>
</head>
<body>
    <main>
        <h1>Item CRUD Lab</h1>
        <p>Redirecting to the interactive API documentation&hellip;</p>
        <p><a href="/api/docs">Swagger UI</a><a href="/api/redoc">ReDoc</a></p>
    </main>
</body>
</html>
"#;

/// Static page forwarding browsers to the API docs
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
