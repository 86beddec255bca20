//! Rate sampling tests driven by a mock clock

#[cfg(test)]
mod tests {
    use crate::core::time::MockTimeProvider;
    use crate::queue::api::Queue;
    use std::sync::Arc;
    use std::time::Duration;

    fn queue_with_clock(max_size: usize) -> (Queue<u32>, MockTimeProvider) {
        let clock = MockTimeProvider::new();
        let queue = Queue::with_time_provider(max_size, Arc::new(clock.clone())).unwrap();
        (queue, clock)
    }

    #[test]
    fn test_first_stats_call_reports_zero_rates() {
        let (queue, _clock) = queue_with_clock(10);
        queue.put(1);
        queue.put(2);

        let stats = queue.stats();
        assert_eq!(stats.dropped_total, 2);
        assert_eq!(stats.in_rate, 0.0);
        assert_eq!(stats.out_rate, 0.0);
        assert_eq!(stats.dropped_rate, 0.0);
    }

    #[test]
    fn test_rates_stable_within_one_second() {
        let (queue, clock) = queue_with_clock(100);
        queue.disable_fall_through();
        queue.stats();

        for i in 0..10 {
            queue.put(i);
        }
        clock.advance(Duration::from_secs(1));
        let first = queue.stats();
        assert_eq!(first.in_rate, 10.0);

        for i in 0..30 {
            queue.put(i);
        }
        clock.advance(Duration::from_millis(500));
        let second = queue.stats();

        assert_eq!(second.in_total, 40);
        assert_eq!(second.in_rate, first.in_rate);
        assert_eq!(second.out_rate, first.out_rate);
        assert_eq!(second.dropped_rate, first.dropped_rate);
    }

    #[test]
    fn test_rates_resample_after_window() {
        let (queue, clock) = queue_with_clock(100);
        queue.disable_fall_through();
        queue.stats();

        for i in 0..20 {
            queue.put(i);
        }
        for _ in 0..8 {
            queue.get();
        }
        clock.advance(Duration::from_secs(2));

        let stats = queue.stats();
        assert_eq!(stats.in_rate, 10.0);
        assert_eq!(stats.out_rate, 4.0);
        assert_eq!(stats.dropped_rate, 0.0);
    }

    #[test]
    fn test_counters_sampled_independently() {
        let (queue, clock) = queue_with_clock(5);
        queue.stats();

        for i in 0..6 {
            queue.put(i);
        }
        queue.disable_fall_through();
        for i in 0..3 {
            queue.put(i);
        }
        clock.advance(Duration::from_secs(3));

        let stats = queue.stats();
        assert_eq!(stats.dropped_rate, 2.0);
        assert_eq!(stats.in_rate, 1.0);
        assert_eq!(stats.out_rate, 0.0);
    }

    #[test]
    fn test_sampled_at_follows_clock() {
        let (queue, clock) = queue_with_clock(5);

        let first = queue.stats();
        clock.advance(Duration::from_secs(7));
        let second = queue.stats();

        assert_eq!((second.sampled_at - first.sampled_at).num_seconds(), 7);
    }

    #[test]
    fn test_stats_serialize_to_json() {
        let (queue, _clock) = queue_with_clock(5);
        queue.disable_fall_through();
        queue.put(1);

        let json = serde_json::to_value(queue.stats()).unwrap();
        assert_eq!(json["size"], 1);
        assert_eq!(json["in_total"], 1);
        assert_eq!(json["dropped_rate"], 0.0);
        assert!(json["sampled_at"].is_string());
    }
}
