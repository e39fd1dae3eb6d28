//! # Review thread of one product
//!
//! [`ReviewThread`] backs the review section of a product page: the product
//! header (with its aggregate rating), the newest-first review list and the
//! "write a review" control.
//!
//! Submitting is optimistic. The new review appears at the top of the list
//! straight away under a `temp-` id, authored by the signed-in user's display
//! name. When the backend accepts it, the list and the product are refetched
//! and the tentative entry disappears in the refetch; when it refuses, exactly
//! the tentative entry is removed and the list is back to what it was.

use std::sync::{Arc, Mutex, MutexGuard};

use api::{Client, NewReview, Product, Review, ReviewSubmitted, Transport};
use chrono::Utc;
use store::KeyValueStore;

use crate::error::ActionError;
use crate::lifecycle::{BusyFlag, ScopeHandle};
use crate::notice::Notices;
use crate::optimistic::{OptimisticList, TentativeId};

/// Author shown on a tentative review when the profile has no usable name.
pub const PLACEHOLDER_AUTHOR: &str = "You";

/// Ratings the backend accepts.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Default)]
struct ThreadState {
    product: Option<Product>,
    reviews: OptimisticList<Review>,
    error: Option<String>,
}

pub struct ReviewThread<T, S> {
    client: Client<T, S>,
    product_id: String,
    scope: ScopeHandle,
    notices: Notices,
    submitting: BusyFlag,
    state: Arc<Mutex<ThreadState>>,
}

impl<T, S> ReviewThread<T, S>
where
    T: Transport + Clone,
    S: KeyValueStore + Clone,
{
    pub fn new(client: Client<T, S>, product_id: impl Into<String>, scope: ScopeHandle) -> Self {
        Self {
            client,
            product_id: product_id.into(),
            scope,
            notices: Notices::new(),
            submitting: BusyFlag::new(),
            state: Arc::default(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product(&self) -> Option<Product> {
        self.lock().product.clone()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.lock().reviews.items().to_vec()
    }

    /// Id of the review still waiting for the backend, if any.
    pub fn pending_review(&self) -> Option<String> {
        self.lock().reviews.pending().map(str::to_string)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    /// Screen-level load error (the product could not be fetched).
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Fetch the product and its reviews.
    ///
    /// A failed review fetch shows an empty list; a failed product fetch is the
    /// screen's error.
    pub async fn load(&self) -> Result<(), ActionError> {
        let product = self
            .scope
            .run(self.client.product(&self.product_id))
            .await
            .ok_or(ActionError::Cancelled)?;
        let reviews = self
            .scope
            .run(self.client.product_reviews(&self.product_id))
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        match reviews {
            Ok(reviews) => state.reviews.refresh(reviews),
            Err(e) => {
                tracing::warn!(product = %self.product_id, error = %e, "could not load reviews");
                state.reviews.refresh(Vec::new());
            }
        }
        match product {
            Ok(product) => {
                state.product = Some(product);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                let err = ActionError::from_api(&e, "Could not load product");
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Post a review with the optimistic protocol described on the module.
    pub async fn submit(&self, rating: u8, text: &str) -> Result<ReviewSubmitted, ActionError> {
        let session = self.client.session();
        if !session.is_authenticated() {
            return Err(ActionError::SignInRequired);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ActionError::invalid("Please write your review"));
        }
        if !RATING_RANGE.contains(&rating) {
            return Err(ActionError::invalid("Rating must be between 1 and 5"));
        }
        let _guard = self.submitting.try_begin().ok_or(ActionError::Busy)?;

        let author_alias = session
            .current_user()
            .as_ref()
            .and_then(|user| user.display_name().map(str::to_string))
            .unwrap_or_else(|| PLACEHOLDER_AUTHOR.to_string());
        let tentative = Review {
            id: TentativeId::new().into_string(),
            product_id: self.product_id.clone(),
            rating,
            title: String::new(),
            body: text.to_string(),
            pros: Vec::new(),
            cons: Vec::new(),
            created_at: Utc::now(),
            author_alias,
        };
        if !self.lock().reviews.begin(tentative) {
            return Err(ActionError::Busy);
        }

        let outcome = self
            .scope
            .run(self.client.submit_review(&self.product_id, &NewReview::new(rating, text)))
            .await
            .ok_or(ActionError::Cancelled)?;

        let ack = match outcome {
            Ok(ack) => ack,
            Err(e) => {
                if !self.scope.is_cancelled() {
                    self.lock().reviews.rollback();
                }
                tracing::error!(product = %self.product_id, error = %e, "review submission failed");
                let err = ActionError::from_api(&e, "Could not submit review");
                self.notices.error(err.to_string());
                return Err(err);
            }
        };

        self.reconcile().await?;
        tracing::info!(product = %self.product_id, "review submitted");
        self.notices.success(if ack.message.trim().is_empty() {
            "Your review was posted"
        } else {
            ack.message.as_str()
        });
        Ok(ack)
    }

    // Authoritative refetch after an accepted review.
    async fn reconcile(&self) -> Result<(), ActionError> {
        let reviews = self
            .scope
            .run(self.client.product_reviews(&self.product_id))
            .await
            .ok_or(ActionError::Cancelled)?;
        let product = self
            .scope
            .run(self.client.product(&self.product_id))
            .await
            .ok_or(ActionError::Cancelled)?;

        let mut state = self.lock();
        if self.scope.is_cancelled() {
            return Err(ActionError::Cancelled);
        }
        match reviews {
            Ok(reviews) => state.reviews.confirm(reviews),
            Err(e) => {
                // The review is stored; it shows up on the next load.
                tracing::warn!(product = %self.product_id, error = %e, "refetch after review failed");
                state.reviews.rollback();
            }
        }
        if let Ok(product) = product {
            state.product = Some(product);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ThreadState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
