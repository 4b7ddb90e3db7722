//! Public types for the dashboard API.

mod metrics;
mod order;
mod profile;
mod restaurant;

pub use metrics::{
    DailyRevenue, DayOrdersAmount, MonthCanceledOrdersAmount, MonthOrdersAmount, MonthRevenue,
    PopularProduct,
};
pub use order::{
    Order, OrderCustomer, OrderDetails, OrderItem, OrderStatus, OrdersPage, OrdersQuery, PageMeta,
    ProductRef,
};
pub use profile::{Profile, Role};
pub use restaurant::{ManagedRestaurant, NewRestaurant, StoreProfileInput};
