//! Product list screen: filters, sorting, paging.

use std::sync::{Arc, Mutex, MutexGuard};

use api::{Category, Client, Product, ProductQuery, Transport};
use store::KeyValueStore;

use crate::error::ActionError;
use crate::lifecycle::ScopeHandle;

/// Products fetched per page.
pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Default)]
struct CatalogState {
    query: ProductQuery,
    products: Vec<Product>,
    exhausted: bool,
    brands: Vec<String>,
    categories: Vec<Category>,
    error: Option<String>,
}

pub struct Catalog<T, S> {
    client: Client<T, S>,
    scope: ScopeHandle,
    state: Arc<Mutex<CatalogState>>,
}

impl<T, S> Catalog<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>, scope: ScopeHandle) -> Self {
        Self {
            client,
            scope,
            state: Arc::default(),
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn brands(&self) -> Vec<String> {
        self.lock().brands.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    pub fn query(&self) -> ProductQuery {
        self.lock().query.clone()
    }

    /// True once a page came back shorter than [`PAGE_SIZE`].
    pub fn is_exhausted(&self) -> bool {
        self.lock().exhausted
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Brand and category pickers. Failures leave a picker empty.
    pub async fn load_filters(&self) -> Result<(), ActionError> {
        let brands = self
            .scope
            .run(self.client.brands())
            .await
            .ok_or(ActionError::Cancelled)?;
        let categories = self
            .scope
            .run(self.client.categories())
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        state.brands = brands.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load brands");
            Vec::new()
        });
        state.categories = categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load categories");
            Vec::new()
        });
        Ok(())
    }

    /// Replace the filters and fetch the first page.
    pub async fn search(&self, query: ProductQuery) -> Result<(), ActionError> {
        let query = query.page(0, PAGE_SIZE);
        let outcome = self
            .scope
            .run(self.client.list_products(&query))
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        state.query = query;
        match outcome {
            Ok(products) => {
                state.exhausted = products.len() < PAGE_SIZE as usize;
                state.products = products;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                let err = ActionError::from_api(&e, "Could not load products");
                state.products.clear();
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Append the next page of the current search.
    pub async fn load_more(&self) -> Result<(), ActionError> {
        let query = {
            let state = self.lock();
            if state.exhausted {
                return Ok(());
            }
            let skip = u32::try_from(state.products.len()).unwrap_or(u32::MAX);
            state.query.clone().page(skip, PAGE_SIZE)
        };
        let outcome = self
            .scope
            .run(self.client.list_products(&query))
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        match outcome {
            Ok(products) => {
                state.exhausted = products.len() < PAGE_SIZE as usize;
                state.products.extend(products);
                Ok(())
            }
            Err(e) => Err(ActionError::from_api(&e, "Could not load products")),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
