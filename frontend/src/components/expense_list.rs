use shared::{Category, Expense};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ExpenseListProps {
    pub expenses: Vec<Expense>,
    pub loading: bool,
    pub error: Option<String>,

    // Event handlers
    pub on_delete: Callback<i64>,
    pub on_recategorize: Callback<(i64, String)>,
}

// "2025-08-25T12:00:00.000Z" -> "2025-08-25"
fn format_date(rfc3339: &str) -> &str {
    rfc3339.split('T').next().unwrap_or(rfc3339)
}

#[function_component(ExpenseList)]
pub fn expense_list(props: &ExpenseListProps) -> Html {
    html! {
        <section class="card expenses-card">
            <h2>{format!("Expenses ({})", props.expenses.len())}</h2>

            {if let Some(error) = props.error.as_ref() {
                html! {
                    <div class="error-message">
                        {error}
                    </div>
                }
            } else { html! {} }}

            {if props.loading {
                html! { <p class="loading">{"Loading..."}</p> }
            } else if props.expenses.is_empty() {
                html! { <p class="empty-state">{"No expenses found"}</p> }
            } else {
                html! {
                    <ul class="expenses-list">
                        {for props.expenses.iter().map(|expense| {
                            render_expense_row(expense, &props.on_delete, &props.on_recategorize)
                        })}
                    </ul>
                }
            }}
        </section>
    }
}

fn render_expense_row(
    expense: &Expense,
    on_delete: &Callback<i64>,
    on_recategorize: &Callback<(i64, String)>,
) -> Html {
    let id = expense.id;

    let delete_click = {
        let on_delete = on_delete.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(id))
    };

    let category_change = {
        let on_recategorize = on_recategorize.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_recategorize.emit((id, select.value()));
        })
    };

    html! {
        <li class="expense-item" key={id.to_string()}>
            <div class="expense-info">
                <div class="expense-header">
                    <span class="expense-description">{&expense.description}</span>
                    <select class="expense-category" onchange={category_change}>
                        {for Category::ALL.iter().map(|category| {
                            html! {
                                <option
                                    value={category.as_str()}
                                    selected={expense.category == *category}
                                >
                                    {category.as_str()}
                                </option>
                            }
                        })}
                    </select>
                </div>
                <span class="expense-date">{format_date(&expense.created_at)}</span>
            </div>
            <div class="expense-actions">
                <span class="expense-amount">{format!("{:.2}", expense.amount)}</span>
                <button class="btn btn-delete" onclick={delete_click}>
                    {"Delete"}
                </button>
            </div>
        </li>
    }
}
