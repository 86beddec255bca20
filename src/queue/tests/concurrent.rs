//! Tests for concurrent queue operations

#[cfg(test)]
mod tests {
    use crate::queue::api::{Queue, QueuePool, SUCCESS};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tokio::task::JoinSet;

    #[test]
    fn test_blocking_put_waits_for_space() {
        let queue = Arc::new(Queue::new(1).unwrap());
        queue.disable_fall_through();
        queue.put(1);

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.put(2))
        };

        thread::sleep(Duration::from_millis(100));
        assert_eq!(queue.size(), 1, "producer should still be blocked");

        assert_eq!(queue.get(), 1);
        producer.join().unwrap();
        assert_eq!(queue.get(), 2);
        assert_eq!(queue.stats().in_total, 2);
    }

    #[test]
    fn test_blocking_get_waits_for_item() {
        let queue: Arc<Queue<&str>> = Arc::new(Queue::new(4).unwrap());
        queue.disable_fall_through();

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.get())
        };

        thread::sleep(Duration::from_millis(50));
        queue.put("wake up");

        assert_eq!(consumer.join().unwrap(), "wake up");
    }

    #[test]
    fn test_rescue_wakes_blocked_consumer() {
        let queue: Arc<Queue<u8>> = Arc::new(Queue::new(4).unwrap());

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.get())
        };

        thread::sleep(Duration::from_millis(50));
        queue.rescue(9);

        assert_eq!(consumer.join().unwrap(), 9);
        assert_eq!(queue.stats().in_total, 0);
    }

    #[test]
    fn test_clean_wakes_blocked_producer() {
        let queue = Arc::new(Queue::new(2).unwrap());
        queue.disable_fall_through();
        queue.put(1);
        queue.put(2);

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.put(3))
        };

        thread::sleep(Duration::from_millis(50));
        queue.clean();
        producer.join().unwrap();

        assert_eq!(queue.dump().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_blocked_producer_drops_after_fall_through_enabled() {
        let queue = Arc::new(Queue::new(1).unwrap());
        queue.disable_fall_through();
        queue.put("first");

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.put("second"))
        };

        thread::sleep(Duration::from_millis(50));
        queue.enable_fall_through();
        producer.join().unwrap();

        let stats = queue.stats();
        assert_eq!(stats.dropped_total, 1);
        assert_eq!(stats.in_total, 1);
        assert_eq!(queue.try_get(), Ok("first"));
    }

    #[test]
    fn test_no_lost_counter_updates_under_contention() {
        let queue = Arc::new(Queue::new(16).unwrap());
        queue.disable_fall_through();

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..500 {
                        queue.put(p * 1000 + i);
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || (0..1000).map(|_| queue.get()).collect::<Vec<u32>>())
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }
        let mut seen = HashSet::new();
        for consumer in consumers {
            for item in consumer.join().unwrap() {
                assert!(seen.insert(item), "item {} delivered twice", item);
            }
        }

        let stats = queue.stats();
        assert_eq!(seen.len(), 2000);
        assert_eq!(stats.in_total, 2000);
        assert_eq!(stats.out_total, 2000);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_single_producer_order_preserved_across_threads() {
        let queue = Arc::new(Queue::new(8).unwrap());
        queue.disable_fall_through();

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || (0..200).for_each(|i| queue.put(i)))
        };

        let received: Vec<u32> = (0..200).map(|_| queue.get()).collect();
        producer.join().unwrap();

        assert_eq!(received, (0..200).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_pipeline_stages_with_blocking_tasks() {
        let pool: Arc<QueuePool<u64>> = Arc::new(QueuePool::new(32).unwrap());
        let inbox = pool.create_queue("inbox").unwrap();
        inbox.disable_fall_through();
        let success = pool.get_queue(SUCCESS).unwrap();

        let mut tasks = JoinSet::new();
        for producer_id in 0..3u64 {
            let inbox = Arc::clone(&inbox);
            tasks.spawn_blocking(move || {
                for i in 0..100 {
                    inbox.put(producer_id * 1000 + i);
                }
            });
        }
        {
            let inbox = Arc::clone(&inbox);
            let success = Arc::clone(&success);
            tasks.spawn_blocking(move || {
                for _ in 0..300 {
                    success.put(inbox.get());
                }
            });
        }
        let sink = {
            let success = Arc::clone(&success);
            tokio::task::spawn_blocking(move || (0..300).map(|_| success.get()).count())
        };

        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }
        assert_eq!(sink.await.unwrap(), 300);

        assert_eq!(inbox.stats().out_total, 300);
        let success_stats = success.stats();
        assert_eq!(success_stats.in_total, 300);
        assert_eq!(success_stats.out_total, 300);
        assert_eq!(success_stats.dropped_total, 0);
        assert!(pool.join_async().await);
    }
}
