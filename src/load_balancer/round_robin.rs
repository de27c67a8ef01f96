//! Round-robin load balancing strategy.

use std::sync::{Arc, Mutex, PoisonError};
use crate::load_balancer::{LoadBalancer, backend::Backend};

/// Round-robin selector.
///
/// Each attempt reads the cursor, advances it by one and reads the
/// candidate's health while holding a single lock, so no two attempts
/// ever start from the same cursor value. The cursor wraps on overflow.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: Mutex<usize>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>> {
        if backends.is_empty() {
            return None;
        }

        let len = backends.len();
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);

        for _ in 0..len {
            let backend = &backends[*cursor % len];
            *cursor = cursor.wrapping_add(1);
            if backend.is_healthy() {
                return Some(backend.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::pool::BackendPool;
    use std::collections::HashMap;
    use std::thread;

    fn pool(n: usize) -> BackendPool {
        let urls: Vec<String> = (0..n).map(|i| format!("http://127.0.0.1:{}", 8080 + i)).collect();
        BackendPool::from_urls(&urls).unwrap()
    }

    fn pick(lb: &RoundRobin, pool: &BackendPool) -> Option<String> {
        lb.next_server(pool.backends()).map(|b| b.address().to_string())
    }

    fn cursor(lb: &RoundRobin) -> usize {
        *lb.cursor.lock().unwrap()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let pool = pool(3);

        let picked: Vec<_> = (0..7).map(|_| pick(&lb, &pool).unwrap()).collect();
        assert_eq!(
            picked,
            vec![
                "http://127.0.0.1:8080",
                "http://127.0.0.1:8081",
                "http://127.0.0.1:8082",
                "http://127.0.0.1:8080",
                "http://127.0.0.1:8081",
                "http://127.0.0.1:8082",
                "http://127.0.0.1:8080",
            ]
        );
        assert_eq!(cursor(&lb), 7);
    }

    #[test]
    fn test_skips_unhealthy() {
        let lb = RoundRobin::new();
        let pool = pool(3);
        pool.set_healthy(1, false);

        let picked: Vec<_> = (0..4).map(|_| pick(&lb, &pool).unwrap()).collect();
        assert_eq!(
            picked,
            vec![
                "http://127.0.0.1:8080",
                "http://127.0.0.1:8082",
                "http://127.0.0.1:8080",
                "http://127.0.0.1:8082",
            ]
        );
    }

    #[test]
    fn test_all_unhealthy_advances_by_len() {
        let lb = RoundRobin::new();
        let pool = pool(4);
        for i in 0..4 {
            pool.set_healthy(i, false);
        }

        assert!(pick(&lb, &pool).is_none());
        assert_eq!(cursor(&lb), 4);
        assert!(pick(&lb, &pool).is_none());
        assert_eq!(cursor(&lb), 8);
    }

    #[test]
    fn test_empty_pool() {
        let lb = RoundRobin::new();
        assert!(pick(&lb, &pool(0)).is_none());
        assert_eq!(cursor(&lb), 0);
    }

    #[test]
    fn test_recovered_backend_rejoins_rotation() {
        let lb = RoundRobin::new();
        let pool = pool(2);
        pool.set_healthy(0, false);

        assert_eq!(pick(&lb, &pool).unwrap(), "http://127.0.0.1:8081");
        assert_eq!(pick(&lb, &pool).unwrap(), "http://127.0.0.1:8081");

        pool.set_healthy(0, true);
        assert_eq!(pick(&lb, &pool).unwrap(), "http://127.0.0.1:8080");
        assert_eq!(pick(&lb, &pool).unwrap(), "http://127.0.0.1:8081");
    }

    #[test]
    fn test_cursor_wraps_on_overflow() {
        let lb = RoundRobin::new();
        *lb.cursor.lock().unwrap() = usize::MAX;
        let pool = pool(1);

        assert!(pick(&lb, &pool).is_some());
        assert_eq!(cursor(&lb), 0);
        assert!(pick(&lb, &pool).is_some());
    }

    #[test]
    fn test_concurrent_selection_is_fair() {
        let lb = Arc::new(RoundRobin::new());
        let pool = Arc::new(pool(5));
        let threads = 8;
        let per_thread = 250;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let lb = lb.clone();
                let pool = pool.clone();
                thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| pick(&lb, &pool).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for handle in handles {
            for addr in handle.join().unwrap() {
                *counts.entry(addr).or_default() += 1;
            }
        }

        // 2000 selections over 5 backends: any shared cursor value would skew this.
        assert_eq!(counts.len(), 5);
        assert!(counts.values().all(|&c| c == threads * per_thread / 5));
        assert_eq!(cursor(&lb), threads * per_thread);
    }
}
