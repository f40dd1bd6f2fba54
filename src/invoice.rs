//! Invoice

use std::io;

use jiff::{Timestamp, tz::TimeZone};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    orders::{Order, OrderId, OrderStatus, PaymentMethod},
    pricing::{self, AmountOutOfRange, DELIVERY_FEE},
};

/// Errors that can occur when building or writing an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// An amount does not fit the money type.
    #[error(transparent)]
    Amount(#[from] AmountOutOfRange),

    /// IO error
    #[error("failed to write invoice")]
    Io(#[source] io::Error),
}

/// One invoice row.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    /// Product name
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Price per unit
    pub unit_price: Money<'static, Currency>,

    /// Unit price times quantity
    pub amount: Money<'static, Currency>,
}

/// Everything a rendered invoice shows for an order.
#[derive(Debug, Clone)]
pub struct Invoice {
    /// Order id
    pub order_id: OrderId,

    /// Order time
    pub issued_at: Timestamp,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Delivery address
    pub delivery_address: String,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Wallet transaction id
    pub transaction_id: Option<String>,

    /// Current status
    pub status: OrderStatus,

    /// Line items
    pub lines: Vec<InvoiceLine>,

    /// Item subtotal
    pub subtotal: Money<'static, Currency>,

    /// Delivery fee
    pub delivery_fee: Money<'static, Currency>,

    /// Subtotal plus delivery fee
    pub total: Money<'static, Currency>,
}

impl Invoice {
    /// Build the invoice view of `order`.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount overflows the money type.
    pub fn from_order(order: &Order) -> Result<Self, InvoiceError> {
        let lines = order
            .items
            .iter()
            .map(|line| -> Result<InvoiceLine, InvoiceError> {
                Ok(InvoiceLine {
                    name: line.product.name.clone(),
                    quantity: line.quantity,
                    unit_price: pricing::to_money(line.product.price)?,
                    amount: pricing::to_money(line.subtotal())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            order_id: order.id.clone(),
            issued_at: order.created_at,
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            delivery_address: order.delivery_address.clone(),
            payment_method: order.payment_method,
            transaction_id: order.transaction_id.clone(),
            status: order.status,
            lines,
            subtotal: pricing::to_money(order.total_amount)?,
            delivery_fee: pricing::to_money(DELIVERY_FEE)?,
            total: pricing::to_money(order.grand_total())?,
        })
    }

    /// Write the invoice as plain text, times shown in `tz`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write, tz: &TimeZone) -> Result<(), InvoiceError> {
        let issued = self.issued_at.to_zoned(tz.clone());

        let mut details = vec![
            ("Order ID".to_string(), self.order_id.to_string()),
            ("Date".to_string(), issued.strftime("%d %b %Y").to_string()),
            ("Time".to_string(), issued.strftime("%I:%M %p").to_string()),
            ("Customer Name".to_string(), self.customer_name.clone()),
            ("Phone".to_string(), self.customer_phone.clone()),
            ("Delivery Address".to_string(), self.delivery_address.clone()),
            (
                "Payment Method".to_string(),
                self.payment_method.label().to_string(),
            ),
        ];

        if let Some(transaction_id) = &self.transaction_id {
            details.push(("Transaction ID".to_string(), transaction_id.clone()));
        }

        details.push(("Status".to_string(), self.status.label().to_string()));

        for (label, value) in details {
            writeln!(out, "{label:>18}: {value}").map_err(InvoiceError::Io)?;
        }

        writeln!(out, "\n{}", self.items_table()).map_err(InvoiceError::Io)?;

        Ok(())
    }

    fn items_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Price", "Amount"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.amount.to_string(),
            ]);
        }

        builder.push_record([
            "Subtotal".to_string(),
            String::new(),
            String::new(),
            self.subtotal.to_string(),
        ]);

        builder.push_record([
            "Delivery Fee".to_string(),
            String::new(),
            String::new(),
            self.delivery_fee.to_string(),
        ]);

        builder.push_record([
            "Total".to_string(),
            String::new(),
            String::new(),
            self.total.to_string(),
        ]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        table.to_string()
    }
}
