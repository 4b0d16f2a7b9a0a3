use std::{sync::Mutex, time::Duration};

use crate::{
    cache::TtlCache,
    client::{ApiClient, Auth, require_data},
    dto::params::{Pagination, SalonSearchQuery},
    error::{AppError, AppResult, lock},
    models::{Category, HomeFeed, Salon},
    response::Paginated,
};

/// Recently viewed salon details, so reopening a salon does not flash a
/// loading state. Never consulted for correctness.
pub struct SalonCache {
    inner: Mutex<TtlCache<i64, Salon>>,
}

impl SalonCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(TtlCache::new(capacity, ttl)),
        }
    }

    fn get(&self, id: i64) -> AppResult<Option<Salon>> {
        Ok(lock(&self.inner, "salon cache")?.get(&id))
    }

    fn put(&self, salon: Salon) -> AppResult<()> {
        lock(&self.inner, "salon cache")?.insert(salon.id, salon);
        Ok(())
    }

    pub fn invalidate(&self, id: i64) -> AppResult<()> {
        lock(&self.inner, "salon cache")?.invalidate(&id);
        Ok(())
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(lock(&self.inner, "salon cache")?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }
}

pub async fn home_feed(client: &ApiClient) -> AppResult<HomeFeed> {
    let resp = client.get("users/home", Auth::Optional).await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn search_salons(
    client: &ApiClient,
    query: &str,
    pagination: Pagination,
) -> AppResult<Paginated<Salon>> {
    let params = SalonSearchQuery {
        search: query.trim().to_string(),
        pagination: pagination.normalize(),
    };
    let resp = client
        .get_query::<Vec<Salon>, _>("users/salons", &params, Auth::Optional)
        .await?;
    Ok(resp.into_page())
}

/// Home screen search box: a blank query shows the home feed salons.
pub async fn filter_home_salons(client: &ApiClient, query: &str) -> AppResult<Vec<Salon>> {
    if query.trim().is_empty() {
        return Ok(home_feed(client).await?.salons);
    }
    Ok(search_salons(client, query, Pagination::page(1)).await?.items)
}

pub async fn salon_detail(client: &ApiClient, cache: &SalonCache, id: i64) -> AppResult<Salon> {
    if let Some(salon) = cache.get(id)? {
        tracing::debug!(salon_id = id, "salon detail served from cache");
        return Ok(salon);
    }
    refresh_salon(client, cache, id).await
}

pub async fn refresh_salon(client: &ApiClient, cache: &SalonCache, id: i64) -> AppResult<Salon> {
    let resp = client
        .get::<Salon>(&format!("users/salons/{id}"), Auth::Optional)
        .await;
    let salon = match resp {
        Ok(resp) => require_data(resp)?,
        Err(err) => {
            if matches!(&err, AppError::Api { status, .. } if *status == reqwest::StatusCode::NOT_FOUND) {
                cache.invalidate(id)?;
            }
            return Err(err);
        }
    };
    cache.put(salon.clone())?;
    Ok(salon)
}

pub async fn salon_categories(client: &ApiClient, salon_id: i64) -> AppResult<Vec<Category>> {
    let resp = client
        .get::<Vec<Category>>(&format!("users/categories/salon/{salon_id}"), Auth::Optional)
        .await?;
    Ok(resp.data.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_cache_reports_internal_error() {
        let cache = std::sync::Arc::new(SalonCache::new(4, Duration::from_secs(60)));
        let poisoner = cache.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join();

        assert!(matches!(cache.len(), Err(AppError::Internal(_))));
        assert!(matches!(cache.invalidate(1), Err(AppError::Internal(_))));
    }
}
