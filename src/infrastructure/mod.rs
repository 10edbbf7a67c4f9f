pub mod clock;
pub mod ids;
pub mod in_memory;
pub mod mock_gateway;
