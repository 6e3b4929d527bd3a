use maud::{Markup, html};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    category::{Category, TransactionType},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

pub struct TransactionFormDefaults<'a> {
    pub amount: Option<Decimal>,
    pub date: Date,
    pub category: Option<&'a Category>,
    pub description: Option<&'a str>,
    pub autofocus_amount: bool,
}

fn category_options(
    transaction_type: TransactionType,
    selected: Option<&Category>,
) -> Markup {
    html! {
        optgroup label=(transaction_type)
        {
            @for category in Category::ALL.iter().filter(|c| c.transaction_type() == transaction_type) {
                option value=(category) selected[selected == Some(category)] { (category) }
            }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));
    let description_placeholder = defaults.description.unwrap_or("Description");
    // Categories outside the fixed list are kept as an extra option so editing
    // does not silently change them.
    let custom_category = defaults
        .category
        .filter(|category| matches!(category, Category::Other(_)));

    html! {
        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (category_options(TransactionType::Income, defaults.category))
                (category_options(TransactionType::Expense, defaults.category))

                @if let Some(category) = custom_category {
                    option value=(category) selected { (category) }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.01"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder=(description_placeholder)
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
