pub mod notify_service;
