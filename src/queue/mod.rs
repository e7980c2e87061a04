pub mod dispatch_queue;
