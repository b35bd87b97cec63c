use axum::{http::StatusCode, response::IntoResponse};

pub const ROBOTS_TXT: &str = "User-agent: *\nAllow: /\nSitemap: /sitemap.txt\n";

pub const SITEMAP_PATHS: [&str; 10] = [
    "/",
    "/es",
    "/en",
    "/ca",
    "/servicios",
    "/nosotros",
    "/contacto",
    "/trabajos-verticales-madrid",
    "/fontaneria-madrid",
    "/impermeabilizacion-cubiertas-madrid",
];

pub fn sitemap_body() -> String {
    SITEMAP_PATHS.join("\n")
}

pub async fn robots_txt() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        ROBOTS_TXT,
    )
}

pub async fn sitemap_txt() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        sitemap_body(),
    )
}
