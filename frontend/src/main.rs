use shared::{Category, CreateExpenseRequest, Expense, UpdateExpenseRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

mod components;
mod services;

use components::{ExpenseForm, ExpenseList};
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    // List state
    let expenses = use_state(Vec::<Expense>::new);
    let selected_category = use_state(|| "all".to_string());
    let loading = use_state(|| true);
    let list_error = use_state(|| Option::<String>::None);

    // Form state for expense creation
    let amount = use_state(String::new);
    let description = use_state(String::new);
    let category = use_state(|| Category::Food.as_str().to_string());
    let form_error = use_state(|| Option::<String>::None);
    let creating = use_state(|| false);

    // Re-fetch the list for the currently selected filter
    let refresh_expenses = {
        let expenses = expenses.clone();
        let loading = loading.clone();
        let list_error = list_error.clone();
        let selected_category = selected_category.clone();

        Callback::from(move |_: ()| {
            let expenses = expenses.clone();
            let loading = loading.clone();
            let list_error = list_error.clone();
            let filter = (*selected_category).clone();

            spawn_local(async move {
                loading.set(true);
                match ApiClient::new().list_expenses(&filter).await {
                    Ok(data) => {
                        list_error.set(None);
                        expenses.set(data);
                    }
                    Err(e) => list_error.set(Some(e)),
                }
                loading.set(false);
            });
        })
    };

    // Fetch on mount and whenever the filter changes
    {
        let refresh_expenses = refresh_expenses.clone();
        use_effect_with((*selected_category).clone(), move |_| {
            refresh_expenses.emit(());
            || ()
        });
    }

    let on_amount_change = {
        let amount = amount.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            amount.set(input.value());
            form_error.set(None);
        })
    };

    let on_description_change = {
        let description = description.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            description.set(input.value());
            form_error.set(None);
        })
    };

    let on_category_change = {
        let category = category.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            category.set(select.value());
        })
    };

    let on_submit = {
        let amount = amount.clone();
        let description = description.clone();
        let category = category.clone();
        let form_error = form_error.clone();
        let creating = creating.clone();
        let refresh_expenses = refresh_expenses.clone();

        Callback::from(move |_: ()| {
            // Mirror the service rules so obvious mistakes never hit the wire
            if amount.is_empty() || description.is_empty() {
                form_error.set(Some("All fields are required".to_string()));
                return;
            }
            let parsed_amount = match amount.parse::<f64>() {
                Ok(value) if value > 0.0 => value,
                _ => {
                    form_error.set(Some(
                        "Amount must be a valid positive number".to_string(),
                    ));
                    return;
                }
            };
            if description.trim().is_empty() {
                form_error.set(Some("Description cannot be empty".to_string()));
                return;
            }

            let request = CreateExpenseRequest {
                amount: Some(parsed_amount),
                description: Some((*description).clone()),
                category: Some((*category).clone()),
            };

            let amount = amount.clone();
            let description = description.clone();
            let form_error = form_error.clone();
            let creating = creating.clone();
            let refresh_expenses = refresh_expenses.clone();

            spawn_local(async move {
                creating.set(true);
                match ApiClient::new().create_expense(request).await {
                    Ok(_) => {
                        form_error.set(None);
                        amount.set(String::new());
                        description.set(String::new());
                        refresh_expenses.emit(());
                    }
                    Err(e) => form_error.set(Some(e)),
                }
                creating.set(false);
            });
        })
    };

    let on_delete = {
        let list_error = list_error.clone();
        let refresh_expenses = refresh_expenses.clone();

        Callback::from(move |id: i64| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Are you sure you want to delete this expense?")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let list_error = list_error.clone();
            let refresh_expenses = refresh_expenses.clone();

            spawn_local(async move {
                match ApiClient::new().delete_expense(id).await {
                    Ok(_) => refresh_expenses.emit(()),
                    Err(e) => list_error.set(Some(e)),
                }
            });
        })
    };

    let on_recategorize = {
        let list_error = list_error.clone();
        let refresh_expenses = refresh_expenses.clone();

        Callback::from(move |(id, new_category): (i64, String)| {
            let list_error = list_error.clone();
            let refresh_expenses = refresh_expenses.clone();

            let request = UpdateExpenseRequest {
                amount: None,
                description: None,
                category: Some(new_category),
            };

            spawn_local(async move {
                match ApiClient::new().update_expense(id, request).await {
                    Ok(_) => refresh_expenses.emit(()),
                    Err(e) => list_error.set(Some(e)),
                }
            });
        })
    };

    let on_filter_change = {
        let selected_category = selected_category.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            selected_category.set(select.value());
        })
    };

    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    html! {
        <div class="app">
            <div class="container">
                <h1>{"Expense Tracker"}</h1>

                <ExpenseForm
                    amount={(*amount).clone()}
                    description={(*description).clone()}
                    category={(*category).clone()}
                    creating={*creating}
                    form_error={(*form_error).clone()}
                    on_amount_change={on_amount_change}
                    on_description_change={on_description_change}
                    on_category_change={on_category_change}
                    on_submit={on_submit}
                />

                <section class="card filter-card">
                    <h2>{"Filter by Category"}</h2>
                    <select class="category-filter" onchange={on_filter_change}>
                        <option value="all" selected={*selected_category == "all"}>
                            {"All Categories"}
                        </option>
                        {for Category::ALL.iter().map(|cat| {
                            html! {
                                <option
                                    value={cat.as_str()}
                                    selected={*selected_category == cat.as_str()}
                                >
                                    {cat.as_str()}
                                </option>
                            }
                        })}
                    </select>
                </section>

                <section class="card total-card">
                    <h2>
                        {"Total: "}
                        <span class="total-amount">{format!("{:.2}", total)}</span>
                    </h2>
                </section>

                <ExpenseList
                    expenses={(*expenses).clone()}
                    loading={*loading}
                    error={(*list_error).clone()}
                    on_delete={on_delete}
                    on_recategorize={on_recategorize}
                />
            </div>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
