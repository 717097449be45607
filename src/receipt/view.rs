//! HTML rendering for the receipts page.

use maud::{Markup, html};
use time::Date;

use crate::{
    config::{AppConfig, UserProfile},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, loading_spinner,
    },
    receipt::Receipt,
};

/// The file types offered by the upload picker.
const UPLOAD_ACCEPT: &str = ".jpg,.jpeg,.png,.gif,.webp,.bmp,.pdf";

pub(crate) fn receipts_view(
    profile: &UserProfile,
    config: &AppConfig,
    receipts: &[Receipt],
    today: Date,
) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-4xl lg:w-full lg:mx-auto"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Receipt Steward" }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Record expenses and store receipt images in your shared sheet and storage folder."
                    }
                }

                (user_selector(profile, config))

                (capture_form(profile, config, today))

                hr class="border-gray-200 dark:border-gray-700";

                (receipts_table(profile, receipts))

                hr class="border-gray-200 dark:border-gray-700";

                (print_section())
            }
        }
    };

    base("Receipts", &content)
}

fn user_selector(profile: &UserProfile, config: &AppConfig) -> Markup {
    html! {
        nav class="flex gap-4 items-center" aria-label="User"
        {
            span class="text-sm font-medium" { "User:" }

            @for user in &config.users {
                @if user.name == profile.name {
                    span class="font-bold" aria-current="true" { (user.name) }
                } @else {
                    a
                        href={ (endpoints::RECEIPTS_VIEW) "?user=" (user.name) }
                        class=(LINK_STYLE)
                    {
                        (user.name)
                    }
                }
            }
        }
    }
}

fn capture_form(profile: &UserProfile, config: &AppConfig, today: Date) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::RECEIPTS_API)
            enctype="multipart/form-data"
            hx-disabled-elt="#submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            h2 class="text-lg font-bold" { "Add Receipt" }

            input type="hidden" name="user" value=(profile.name);

            div class="grid gap-4 md:grid-cols-2"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="text"
                        value=(today)
                        placeholder="YYYY-MM-DD or DD/MM/YYYY"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="item" class=(FORM_LABEL_STYLE) { "Item" }

                    input
                        name="item"
                        id="item"
                        type="text"
                        placeholder="e.g. Groceries at Store"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in &config.categories {
                            option value=(category) { (category) }
                        }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="receipt_file" class=(FORM_LABEL_STYLE) { "Receipt Image" }

                input
                    name="receipt_file"
                    id="receipt_file"
                    type="file"
                    accept=(UPLOAD_ACCEPT)
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Upload a receipt photo or PDF (optional)."
                }
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (spinner) }
                " Save Receipt"
            }
        }
    }
}

fn receipts_table(profile: &UserProfile, receipts: &[Receipt]) -> Markup {
    html! {
        section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
        {
            h2 class="text-lg font-bold px-6 py-3" { "Transactions" }

            table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class="px-6 py-3" { "Item" }
                        th scope="col" class="px-6 py-3" { "Date" }
                        th scope="col" class="px-6 py-3" { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class="px-6 py-3" { "Receipt" }
                        th scope="col" class="px-6 py-3" { "Actions" }
                    }
                }

                tbody
                {
                    @if receipts.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" data-empty-state="true" class=(TABLE_CELL_STYLE)
                            {
                                "No receipts recorded yet. Add one above!"
                            }
                        }
                    }

                    @for receipt in receipts {
                        (receipt_row(profile, receipt))
                    }
                }
            }
        }
    }
}

fn receipt_row(profile: &UserProfile, receipt: &Receipt) -> Markup {
    let delete_url = format!(
        "{}?user={}",
        format_endpoint(endpoints::DELETE_RECEIPT, &receipt.id),
        profile.name
    );
    let amount = match receipt.amount_value() {
        Some(value) => format_currency(value),
        None => "—".to_owned(),
    };

    html! {
        tr data-receipt-row="true" class=(TABLE_ROW_STYLE)
        {
            th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
            {
                (receipt.item)
            }

            td class=(TABLE_CELL_STYLE) { (receipt.date) }

            td class=(TABLE_CELL_STYLE) { (receipt.category) }

            td class="px-6 py-4 text-right" { (amount) }

            td class=(TABLE_CELL_STYLE)
            {
                @if !receipt.drive_file_id.is_empty() {
                    a
                        href={ "https://drive.google.com/file/d/" (receipt.drive_file_id) "/view" }
                        target="_blank"
                        rel="noopener"
                        class=(LINK_STYLE)
                    {
                        "View"
                    }
                } @else {
                    span class="text-gray-400" { "—" }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn print_section() -> Markup {
    html! {
        details class="rounded bg-gray-50 dark:bg-gray-800 px-6 py-4"
        {
            summary class="cursor-pointer font-medium" { "Print / Export Report" }

            p class="mt-2 text-sm text-gray-500 dark:text-gray-400"
            {
                "Report printing is not available yet. Filter by month, generate a report, and export to PDF will arrive in a later release."
            }

            button type="button" disabled class=(BUTTON_PRIMARY_STYLE) { "Generate Report" }
        }
    }
}
