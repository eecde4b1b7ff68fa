//! Product catalog collaborator: remote fetch or local file, reduced to the
//! id-keyed mapping the enricher joins against.
//!
//! A failed fetch is never fatal. The pipeline logs a warning and proceeds
//! with an empty catalog, so every record simply reports no match. A local
//! catalog file named on the command line is different: the operator asked
//! for that exact file, so errors there abort the run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One product row as served by the catalog API. Metadata fields are
/// nullable upstream and stay optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: u64,
    pub title: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    products: Vec<CatalogProduct>,
}

/// Local catalog files may hold either the API response shape
/// (`{"products": [...]}`) or a bare product array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Response(CatalogResponse),
    Products(Vec<CatalogProduct>),
}

/// The metadata kept per product id for the enrichment join.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
}

pub type CatalogMap = HashMap<u64, CatalogEntry>;

/// Blocking GET with a bounded timeout. Any failure (connect, timeout,
/// non-2xx status, undecodable body) degrades to an empty catalog.
pub fn fetch_catalog(url: &str, timeout: Duration) -> Vec<CatalogProduct> {
    match try_fetch(url, timeout) {
        Ok(products) => {
            info!("Fetched {} catalog products from {url}", products.len());
            products
        }
        Err(err) => {
            warn!("Catalog fetch from {url} failed ({err:#}); continuing without catalog data");
            Vec::new()
        }
    }
}

fn try_fetch(url: &str, timeout: Duration) -> Result<Vec<CatalogProduct>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("Building HTTP client")?;
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .with_context(|| format!("Requesting {url}"))?;
    let body: CatalogResponse = response
        .json()
        .with_context(|| format!("Decoding catalog response from {url}"))?;
    Ok(body.products)
}

/// Reads a catalog from a local JSON file. Unlike the fetch path, errors
/// here are fatal.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogProduct>> {
    let bytes = fs::read(path).with_context(|| format!("Reading catalog file {path:?}"))?;
    let document: CatalogDocument =
        serde_json::from_slice(&bytes).with_context(|| format!("Parsing catalog file {path:?}"))?;
    let products = match document {
        CatalogDocument::Response(response) => response.products,
        CatalogDocument::Products(products) => products,
    };
    info!("Loaded {} catalog products from {path:?}", products.len());
    Ok(products)
}

pub fn product_mapping(products: &[CatalogProduct]) -> CatalogMap {
    products
        .iter()
        .map(|product| {
            (
                product.id,
                CatalogEntry {
                    title: product.title.clone(),
                    category: product.category.clone(),
                    brand: product.brand.clone(),
                    rating: product.rating,
                },
            )
        })
        .collect()
}

/// Catalog source selection: an explicit file wins, offline mode yields an
/// empty catalog, otherwise the URL is fetched.
pub fn resolve_products(
    file: Option<&Path>,
    url: &str,
    timeout: Duration,
    offline: bool,
) -> Result<Vec<CatalogProduct>> {
    if let Some(path) = file {
        return load_catalog(path);
    }
    if offline {
        info!("Offline mode: skipping catalog fetch");
        return Ok(Vec::new());
    }
    Ok(fetch_catalog(url, timeout))
}
